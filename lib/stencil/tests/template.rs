#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use rdf_stencil::model::vocab::{rdf, xsd};
use rdf_stencil::model::*;
use rdf_stencil::{ParseError, Record, RenderError, Template, TemplateConfig};
use std::collections::HashSet;
use std::error::Error;

const DOG: &str = r#"
@prefix ex: <http://example.com/> .

ex:rex a ll:uri(v=classSlot) ;
    ex:name ll:literal(v=nameSlot, type=xsd:string) ;
    ex:owner [
        ex:name ll:literal(ownerName, lang=en)
    ] ;
    ex:comment """A dog, not ll:uri(x)
and still not ll:blank(y)""" .
"#;

fn template(text: &str) -> Result<Template, Box<dyn Error>> {
    let mut template = Template::from_config(&TemplateConfig::new("dogs"), None)?;
    template.bind("ex", "http://example.com/")?;
    template.parse(text)?;
    Ok(template)
}

fn ex(name: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{name}"))
}

fn dog() -> Record {
    Record::new()
        .with_field("classSlot", vec!["ex:Dog", "ex:Pet"])
        .with_field("nameSlot", "Rex")
        .with_field("ownerName", "Alice")
}

#[test]
fn test_render_dog() -> Result<(), Box<dyn Error>> {
    let template = template(DOG)?;
    assert_eq!(template.slots(), ["classSlot", "nameSlot", "ownerName"]);

    let graph = template.render(&dog())?;

    let rex = ex("rex");
    assert!(graph.contains(TripleRef::new(&rex, rdf::TYPE, &ex("Dog"))));
    assert!(graph.contains(TripleRef::new(&rex, rdf::TYPE, &ex("Pet"))));
    assert!(graph.contains(TripleRef::new(
        &rex,
        &ex("name"),
        &Literal::new_typed_literal("Rex", xsd::STRING)
    )));
    assert!(graph.contains(TripleRef::new(
        &rex,
        &ex("comment"),
        &Literal::new_simple_literal("A dog, not ll:uri(x)\nand still not ll:blank(y)")
    )));
    let owner = graph
        .object_for_subject_predicate(&rex, &ex("owner"))
        .ok_or("no owner")?;
    let TermRef::BlankNode(owner) = owner else {
        panic!("The owner should be a blank node");
    };
    assert!(graph.contains(TripleRef::new(
        owner,
        &ex("name"),
        &Literal::new_language_tagged_literal("Alice", "en")?
    )));
    assert_eq!(graph.len(), 6);
    Ok(())
}

#[test]
fn test_rendering_is_idempotent() -> Result<(), Box<dyn Error>> {
    let template = template(DOG)?;
    let record = dog();
    assert_eq!(template.render(&record)?, template.render(&record)?);
    Ok(())
}

#[test]
fn test_blank_nodes_are_anchored_to_the_record() -> Result<(), Box<dyn Error>> {
    let template = template(
        "_:a ex:knows _:b .\n\
         _:b ex:name ll:literal(name) .\n",
    )?;
    let first = Record::new().with_field("name", "Rex");
    let second = Record::new().with_field("name", "Rex");

    let blanks = |graph: &Graph| {
        graph
            .iter()
            .flat_map(|triple| {
                [
                    Term::from(triple.subject.into_owned()),
                    triple.object.into_owned(),
                ]
            })
            .filter_map(|term| match term {
                Term::BlankNode(node) => Some(node),
                _ => None,
            })
            .collect::<HashSet<_>>()
    };

    let graph = template.render(&first)?;
    let first_blanks = blanks(&graph);
    assert_eq!(first_blanks.len(), 2);
    let knows = graph
        .triples_for_predicate(&ex("knows"))
        .next()
        .ok_or("no knows edge")?;
    let named = graph
        .triples_for_predicate(&ex("name"))
        .next()
        .ok_or("no name edge")?;
    assert_eq!(knows.object, TermRef::from(named.subject));

    let second_blanks = blanks(&template.render(&second)?);
    assert_eq!(second_blanks.len(), 2);
    assert!(first_blanks.is_disjoint(&second_blanks));
    Ok(())
}

#[test]
fn test_single_values_do_not_grow() -> Result<(), Box<dyn Error>> {
    let template = template(DOG)?;
    let record = dog().with_field("classSlot", "ex:Dog");
    assert!(template.render(&record)?.len() <= template.relations().len());
    Ok(())
}

#[test]
fn test_cross_product() -> Result<(), Box<dyn Error>> {
    let template = template("ll:uri(dogs) ex:likes ll:uri(toys) .")?;
    let record = Record::new()
        .with_field("dogs", vec!["ex:rex", "ex:fido"])
        .with_field("toys", vec!["ex:ball", "ex:stick", "ex:bone"]);
    assert_eq!(template.render(&record)?.len(), 6);
    Ok(())
}

#[test]
fn test_empty_json_array_drops_only_its_edges() -> Result<(), Box<dyn Error>> {
    let template = template("ll:uri(dog) ex:likes ll:uri(toys) ;\n    ex:name ll:literal(name) .")?;
    let records = Record::parse_json(r#"{"dog": "ex:rex", "toys": [], "name": "Rex"}"#)?;
    let graph = template.render_all(&records)?;
    assert_eq!(graph.len(), 1);
    assert!(graph.contains(TripleRef::new(
        &ex("rex"),
        &ex("name"),
        &Literal::new_simple_literal("Rex")
    )));
    Ok(())
}

#[test]
fn test_missing_field_names_slot_and_term() -> Result<(), Box<dyn Error>> {
    let template = template(DOG)?;
    let record = Record::new().with_field("classSlot", "ex:Dog");
    match template.render(&record) {
        Err(RenderError::FieldMissing { slot, term, .. }) => {
            assert!(["nameSlot", "ownerName"].contains(&slot.as_str()));
            assert!(term.contains(&slot));
        }
        result => panic!("Unexpected result {result:?}"),
    }
    Ok(())
}

#[test]
fn test_unsupported_argument() -> Result<(), Box<dyn Error>> {
    let mut template = Template::from_config(&TemplateConfig::default(), None)?;
    let errors = template
        .parse("# Dogs\n\n<http://example.com/rex> rdfs:label ll:literal(v=x, foo=bar) .\n")
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    let error = &errors.0[0];
    assert!(matches!(error, ParseError::Template(_)));
    assert_eq!(error.line(), 3);
    assert!(error.message().contains("foo"));
    assert_eq!(template.errors(), errors.0.as_slice());
    Ok(())
}

#[test]
fn test_unresolvable_datatypes_are_syntax_errors() -> Result<(), Box<dyn Error>> {
    let mut template = Template::from_config(&TemplateConfig::default(), None)?;
    let errors = template
        .parse(
            "<http://example.com/rex> rdfs:label ll:literal(name, type=foo:bar) .\n\
             <http://example.com/rex> rdfs:comment ll:literal(age, type=integer) .\n",
        )
        .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|error| matches!(error, ParseError::Template(_))));
    assert_eq!(
        errors.iter().map(ParseError::line).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(errors.0[0].message().contains("'foo'"));
    assert!(errors.0[1].message().contains("integer"));
    assert!(template.is_empty());
    Ok(())
}

#[test]
fn test_language_wins_over_datatype() -> Result<(), Box<dyn Error>> {
    let template = template("ex:rex ex:name ll:literal(name, type=xsd:string, lang=en) .")?;
    let graph = template.render(&Record::new().with_field("name", "Rex"))?;
    assert_eq!(graph.len(), 1);
    assert!(graph.contains(TripleRef::new(
        &ex("rex"),
        &ex("name"),
        &Literal::new_language_tagged_literal("Rex", "en")?
    )));
    Ok(())
}

#[test]
fn test_native_literals_keep_their_tags() -> Result<(), Box<dyn Error>> {
    let template = template("ex:rex ex:name \"Rex\"@en ; ex:age \"3\"^^xsd:integer .")?;
    let graph = template.render(&Record::new())?;
    assert_eq!(graph.len(), 2);
    assert!(graph.contains(TripleRef::new(
        &ex("rex"),
        &ex("name"),
        &Literal::new_language_tagged_literal("Rex", "en")?
    )));
    assert!(graph.contains(TripleRef::new(
        &ex("rex"),
        &ex("age"),
        &Literal::new_typed_literal("3", xsd::INTEGER)
    )));
    Ok(())
}

#[test]
fn test_graph_error_line_after_long_string() -> Result<(), Box<dyn Error>> {
    let mut template = Template::from_config(&TemplateConfig::default(), None)?;
    let errors = template
        .parse(
            "<http://example.com/a> rdfs:comment \"\"\"one\ntwo\nthree\"\"\" .\n\
             <http://example.com/a> rdfs:label ll:literal(x) ll:literal(y) .\n",
        )
        .unwrap_err();
    assert!(matches!(errors.0[0], ParseError::Graph(_)));
    assert_eq!(errors.0[0].line(), 4);
    Ok(())
}

#[test]
fn test_short_forms_round_trip() -> Result<(), Box<dyn Error>> {
    let template = template("ex:a ex:b ex:c .")?;
    for short in ["ex:Dog", "rdf:type", "xsd:integer", "ex:"] {
        assert_eq!(template.shorten(&template.lengthen(short)), short);
    }
    assert_eq!(template.lengthen("nocolon"), "nocolon");
    assert_eq!(template.lengthen("unknown:x"), "unknown:x");
    assert_eq!(
        template.shorten("http://lodlord/literal?v=name&lang=en"),
        "ll:literal(name,lang=en)"
    );
    Ok(())
}

#[test]
fn test_visualize() -> Result<(), Box<dyn Error>> {
    let dot = template(DOG)?.to_dot();
    assert!(dot.contains("label=\"dogs\""));
    assert!(dot.contains("ll:uri(classSlot)"));
    assert!(!dot.contains("[label=\"ex:name\", shape"));
    Ok(())
}
