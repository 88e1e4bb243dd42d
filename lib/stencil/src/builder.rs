use rdf_stencil_model::{
    vocab, BlankTerm, LiteralTerm, NamedNode, NamespaceTable, PlaceholderFunction, RelationIndex,
    TemplateTerm, Term, TermId, TermTable, Triple, UriTerm,
};
use tracing::warn;

/// Folds parsed triples into a [TermTable] and a [RelationIndex].
///
/// Every term is classified once, on its first occurrence. Placeholder IRIs become slotted
/// terms, everything else is copied.
pub struct TermBuilder<'namespaces> {
    namespaces: &'namespaces NamespaceTable,
    terms: TermTable,
    relations: RelationIndex,
    literal_count: u64,
}

impl<'namespaces> TermBuilder<'namespaces> {
    pub fn new(namespaces: &'namespaces NamespaceTable) -> Self {
        Self {
            namespaces,
            terms: TermTable::new(),
            relations: RelationIndex::new(),
            literal_count: 0,
        }
    }

    pub fn add_triple(&mut self, triple: Triple) {
        let subject = self.add_term(triple.subject.into());
        let predicate = self.add_term(triple.predicate.into());
        let object = self.add_term(triple.object);

        if let Some(term) = self.terms.get_mut(&predicate) {
            term.mark_predicate();
        }
        self.relations.insert(subject, predicate, object);
    }

    pub fn finish(self) -> (TermTable, RelationIndex) {
        (self.terms, self.relations)
    }

    fn add_term(&mut self, term: Term) -> TermId {
        let id = self.term_id(&term);
        if !self.terms.contains(&id) {
            self.terms.insert(self.classify(id, term));
        }
        id
    }

    fn term_id(&mut self, term: &Term) -> TermId {
        match term {
            Term::NamedNode(node) => TermId::for_named_node(node.as_str()),
            Term::BlankNode(node) => TermId::for_blank_node(node.as_str()),
            // Every literal occurrence is a term of its own.
            Term::Literal(_) => {
                self.literal_count += 1;
                TermId::digest(&format!("literal#{}", self.literal_count))
            }
        }
    }

    fn classify(&self, id: TermId, term: Term) -> TemplateTerm {
        match term {
            Term::NamedNode(node) => self.classify_named_node(id, node.into_string()),
            Term::BlankNode(node) => {
                let label = node.into_string();
                TemplateTerm::Blank(BlankTerm {
                    id,
                    short_uri: label.clone(),
                    uri: label,
                    slot: None,
                    is_predicate: false,
                })
            }
            Term::Literal(literal) => {
                let (value, data_type, lang) = literal.destruct();
                // Plain strings carry no datatype, like language-tagged ones.
                let data_type = data_type.filter(|data_type| *data_type != vocab::xsd::STRING);
                let data_type = data_type.map(NamedNode::into_string);
                TemplateTerm::Literal(LiteralTerm {
                    id,
                    value,
                    short_data_type: data_type.as_deref().map(|iri| self.namespaces.shorten(iri)),
                    data_type,
                    lang,
                    uri: None,
                    short_uri: None,
                    slot: None,
                    is_predicate: false,
                })
            }
        }
    }

    fn classify_named_node(&self, id: TermId, uri: String) -> TemplateTerm {
        let short_uri = self.namespaces.shorten(&uri);
        let Some(call) = self.namespaces.placeholder().decode(&uri) else {
            return TemplateTerm::Uri(UriTerm {
                id,
                uri,
                short_uri,
                slot: None,
                is_predicate: false,
            });
        };

        match call.function {
            PlaceholderFunction::Uri => TemplateTerm::Uri(UriTerm {
                id,
                uri,
                short_uri,
                slot: Some(call.slot),
                is_predicate: false,
            }),
            PlaceholderFunction::Blank => TemplateTerm::Blank(BlankTerm {
                id,
                uri,
                short_uri,
                slot: Some(call.slot),
                is_predicate: false,
            }),
            PlaceholderFunction::Literal => {
                if call.language.is_some() && call.datatype.is_some() {
                    warn!("{short_uri} sets both a datatype and a language, the language is used");
                }
                let data_type = call
                    .datatype
                    .filter(|_| call.language.is_none())
                    .map(|data_type| self.namespaces.lengthen(&data_type));
                TemplateTerm::Literal(LiteralTerm {
                    id,
                    value: String::new(),
                    short_data_type: data_type.as_deref().map(|iri| self.namespaces.shorten(iri)),
                    data_type,
                    lang: call.language,
                    uri: Some(uri),
                    short_uri: Some(short_uri),
                    slot: Some(call.slot),
                    is_predicate: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_stencil_model::{BlankNode, Literal};

    fn named(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn build(triples: Vec<Triple>) -> (TermTable, RelationIndex) {
        let mut namespaces = NamespaceTable::default();
        namespaces.bind("ex", "http://example.com/").unwrap();
        let mut builder = TermBuilder::new(&namespaces);
        for triple in triples {
            builder.add_triple(triple);
        }
        builder.finish()
    }

    #[test]
    fn test_named_nodes_are_shared() {
        let (terms, relations) = build(vec![
            Triple::new(
                named("http://example.com/a"),
                named("http://example.com/p"),
                named("http://example.com/b"),
            ),
            Triple::new(
                named("http://example.com/b"),
                named("http://example.com/p"),
                named("http://example.com/a"),
            ),
        ]);

        assert_eq!(terms.len(), 3);
        assert_eq!(relations.len(), 2);
        let predicate = terms
            .get(&TermId::for_named_node("http://example.com/p"))
            .unwrap();
        assert!(predicate.is_predicate());
        assert_eq!(predicate.to_string(), "ex:p");
    }

    #[test]
    fn test_predicate_flag_is_set_on_late_observation() {
        let (terms, _) = build(vec![
            Triple::new(
                named("http://example.com/p"),
                named("http://example.com/q"),
                named("http://example.com/o"),
            ),
            Triple::new(
                named("http://example.com/s"),
                named("http://example.com/p"),
                named("http://example.com/o"),
            ),
        ]);
        assert!(terms
            .get(&TermId::for_named_node("http://example.com/p"))
            .unwrap()
            .is_predicate());
        assert!(!terms
            .get(&TermId::for_named_node("http://example.com/s"))
            .unwrap()
            .is_predicate());
    }

    #[test]
    fn test_literals_are_distinct_per_occurrence() {
        let triple = Triple::new(
            named("http://example.com/a"),
            named("http://example.com/p"),
            Literal::new_simple_literal("x"),
        );
        let (terms, relations) = build(vec![triple.clone(), triple]);
        assert_eq!(terms.len(), 4);
        assert_eq!(relations.len(), 2);
    }

    #[test]
    fn test_native_literals() {
        let (terms, _) = build(vec![
            Triple::new(
                named("http://example.com/a"),
                named("http://example.com/p"),
                Literal::new_typed_literal("1", vocab::xsd::INTEGER),
            ),
            Triple::new(
                named("http://example.com/a"),
                named("http://example.com/q"),
                Literal::new_language_tagged_literal("chat", "fr").unwrap(),
            ),
        ]);
        let mut literals = terms
            .iter()
            .filter_map(|(_, term)| match term {
                TemplateTerm::Literal(literal) => Some(literal.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        literals.sort_by(|a, b| a.value.cmp(&b.value));

        assert_eq!(literals[0].value, "1");
        assert_eq!(literals[0].short_data_type.as_deref(), Some("xsd:integer"));
        assert_eq!(literals[0].slot, None);
        assert_eq!(literals[1].value, "chat");
        assert_eq!(literals[1].lang.as_deref(), Some("fr"));
        assert_eq!(literals[1].data_type, None);
    }

    #[test]
    fn test_placeholders() {
        let (terms, _) = build(vec![
            Triple::new(
                named("http://lodlord/blank?v=dog"),
                named("http://lodlord/uri?v=relation"),
                named("http://lodlord/literal?v=name&type=xsd:string"),
            ),
            Triple::new(
                named("http://lodlord/blank?v=dog"),
                named("http://example.com/p"),
                named("http://lodlord/unknown?v=x"),
            ),
        ]);

        let subject = terms
            .get(&TermId::for_named_node("http://lodlord/blank?v=dog"))
            .unwrap();
        assert!(matches!(subject, TemplateTerm::Blank(_)));
        assert_eq!(subject.slot(), Some("dog"));
        assert_eq!(subject.to_string(), "ll:blank(dog)");

        let predicate = terms
            .get(&TermId::for_named_node("http://lodlord/uri?v=relation"))
            .unwrap();
        assert!(matches!(predicate, TemplateTerm::Uri(_)));
        assert_eq!(predicate.slot(), Some("relation"));

        let TemplateTerm::Literal(object) = terms
            .get(&TermId::for_named_node(
                "http://lodlord/literal?v=name&type=xsd:string",
            ))
            .unwrap()
        else {
            panic!("Expected a literal placeholder");
        };
        assert_eq!(object.slot.as_deref(), Some("name"));
        assert_eq!(object.value, "");
        assert_eq!(
            object.data_type.as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#string")
        );
        assert_eq!(object.short_data_type.as_deref(), Some("xsd:string"));

        let fallback = terms
            .get(&TermId::for_named_node("http://lodlord/unknown?v=x"))
            .unwrap();
        assert!(matches!(fallback, TemplateTerm::Uri(_)));
        assert_eq!(fallback.slot(), None);
    }

    #[test]
    fn test_language_wins_over_datatype() {
        let iri = "http://lodlord/literal?v=label&type=xsd:string&lang=en";
        let (terms, _) = build(vec![Triple::new(
            named("http://example.com/a"),
            named("http://example.com/p"),
            named(iri),
        )]);

        let TemplateTerm::Literal(literal) = terms.get(&TermId::for_named_node(iri)).unwrap()
        else {
            panic!("Expected a literal placeholder");
        };
        assert_eq!(literal.lang.as_deref(), Some("en"));
        assert_eq!(literal.data_type, None);
        assert_eq!(literal.short_data_type, None);
    }

    #[test]
    fn test_native_blank_nodes() {
        let node = BlankNode::new("b0").unwrap();
        let (terms, relations) = build(vec![Triple::new(
            node.clone(),
            named("http://example.com/p"),
            node,
        )]);
        assert_eq!(terms.len(), 2);
        assert_eq!(relations.len(), 1);
        let blank = terms.get(&TermId::for_blank_node("b0")).unwrap();
        assert!(matches!(blank, TemplateTerm::Blank(_)));
        assert_eq!(blank.to_string(), "_:b0");
    }
}
