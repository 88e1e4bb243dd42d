use crate::error::{FieldError, Position, RenderError};
use crate::record::{FieldSource, FieldValue};
use itertools::iproduct;
use rdf_stencil_model::{
    BlankNode, Graph, Literal, LiteralTerm, NamedNode, NamespaceTable, RelationIndex,
    Subject, TemplateTerm, Term, TermId, TermTable, TripleRef, UriTerm,
};
use tracing::debug;

/// Instantiates a parsed template for one record at a time.
///
/// Each edge of the template yields the cross product of the values of its three positions. An
/// edge whose subject and object are both bound to sequences of length `n` and `m` therefore
/// produces `n * m` triples.
#[derive(Clone, Copy, Debug)]
pub struct Renderer<'template> {
    namespaces: &'template NamespaceTable,
    terms: &'template TermTable,
    relations: &'template RelationIndex,
}

impl<'template> Renderer<'template> {
    pub fn new(
        namespaces: &'template NamespaceTable,
        terms: &'template TermTable,
        relations: &'template RelationIndex,
    ) -> Self {
        Self {
            namespaces,
            terms,
            relations,
        }
    }

    /// Renders `record` into a new graph.
    pub fn render<R: FieldSource + ?Sized>(&self, record: &R) -> Result<Graph, RenderError> {
        let mut graph = Graph::new();
        self.render_into(record, &mut graph)?;
        Ok(graph)
    }

    /// Renders `record` and adds the triples to `graph`.
    ///
    /// On error, `graph` may contain the triples of the edges rendered so far.
    pub fn render_into<R: FieldSource + ?Sized>(
        &self,
        record: &R,
        graph: &mut Graph,
    ) -> Result<(), RenderError> {
        let before = graph.len();
        for (subject, predicate, object) in self.relations.edges() {
            let subjects = self
                .instantiate(subject, Position::Subject, record)?
                .into_iter()
                .map(|term| into_subject(term, self.term(subject)?))
                .collect::<Result<Vec<_>, _>>()?;
            let predicates = self
                .instantiate(predicate, Position::Predicate, record)?
                .into_iter()
                .map(|term| into_predicate(term, self.term(predicate)?))
                .collect::<Result<Vec<_>, _>>()?;
            let objects = self.instantiate(object, Position::Object, record)?;

            for (s, p, o) in iproduct!(&subjects, &predicates, &objects) {
                graph.insert(TripleRef::new(s, p, o));
            }
        }
        debug!(
            "Rendered record {} into {} new triples",
            record.id(),
            graph.len() - before
        );
        Ok(())
    }

    fn term(&self, id: TermId) -> Result<&'template TemplateTerm, RenderError> {
        self.terms
            .get(&id)
            .ok_or_else(|| RenderError::UnknownTerm(id.to_hex()))
    }

    /// Returns the concrete terms for the template term `id`, one per field value.
    ///
    /// A field without values yields no terms, so the edges using it render no triples.
    fn instantiate<R: FieldSource + ?Sized>(
        &self,
        id: TermId,
        position: Position,
        record: &R,
    ) -> Result<Vec<Term>, RenderError> {
        let term = self.term(id)?;
        check_position(term, position)?;

        let Some(slot) = term.slot() else {
            return Ok(vec![self.fixed_term(term, record)]);
        };
        let field = record.get_field(slot).map_err(|error| match error {
            FieldError::FieldNotFound(_) => RenderError::FieldMissing {
                slot: slot.to_owned(),
                term: term.to_string(),
                position,
            },
        })?;
        if field.values().is_empty() {
            debug!(
                "The field '{slot}' of record {} is empty, skipping {term}",
                record.id()
            );
        }

        match term {
            TemplateTerm::Uri(uri) => self.substitute_uri(uri, slot, &field),
            TemplateTerm::Blank(_) => Ok(field
                .values()
                .iter()
                .map(|value| anchored_blank_node(record.id(), &format!("value:{value}")).into())
                .collect()),
            TemplateTerm::Literal(literal) => substitute_literal(literal, slot, &field),
        }
    }

    fn fixed_term<R: FieldSource + ?Sized>(&self, term: &TemplateTerm, record: &R) -> Term {
        match term {
            TemplateTerm::Uri(uri) => NamedNode::new_unchecked(uri.uri.as_str()).into(),
            TemplateTerm::Blank(blank) => {
                anchored_blank_node(record.id(), &format!("term:{}", blank.id)).into()
            }
            TemplateTerm::Literal(literal) => {
                if let Some(lang) = &literal.lang {
                    Literal::new_language_tagged_literal_unchecked(
                        literal.value.as_str(),
                        lang.as_str(),
                    )
                    .into()
                } else if let Some(data_type) = &literal.data_type {
                    Literal::new_typed_literal(
                        literal.value.as_str(),
                        NamedNode::new_unchecked(data_type.as_str()),
                    )
                    .into()
                } else {
                    Literal::new_simple_literal(literal.value.as_str()).into()
                }
            }
        }
    }

    fn substitute_uri(
        &self,
        term: &UriTerm,
        slot: &str,
        field: &FieldValue,
    ) -> Result<Vec<Term>, RenderError> {
        field
            .values()
            .iter()
            .map(|value| {
                NamedNode::new(self.namespaces.lengthen(value))
                    .map(Term::from)
                    .map_err(|error| RenderError::InvalidValue {
                        slot: slot.to_owned(),
                        value: value.clone(),
                        term: term.short_uri.clone(),
                        reason: error.to_string(),
                    })
            })
            .collect()
    }
}

fn substitute_literal(
    term: &LiteralTerm,
    slot: &str,
    field: &FieldValue,
) -> Result<Vec<Term>, RenderError> {
    let invalid_value = |value: &str, reason: String| RenderError::InvalidValue {
        slot: slot.to_owned(),
        value: value.to_owned(),
        term: term.short_uri.clone().unwrap_or_else(|| slot.to_owned()),
        reason,
    };
    let data_type = term.data_type.as_deref().map(NamedNode::new_unchecked);

    field
        .values()
        .iter()
        .map(|value| {
            let literal = if let Some(lang) = &term.lang {
                Literal::new_language_tagged_literal(value.as_str(), lang.as_str())
                    .map_err(|error| invalid_value(value, error.to_string()))?
            } else if let Some(data_type) = &data_type {
                Literal::new_typed_literal(value.as_str(), data_type.clone())
            } else {
                Literal::new_simple_literal(value.as_str())
            };
            Ok(literal.into())
        })
        .collect()
}

fn check_position(term: &TemplateTerm, position: Position) -> Result<(), RenderError> {
    let valid = match term {
        TemplateTerm::Uri(_) => true,
        TemplateTerm::Blank(_) => position != Position::Predicate,
        TemplateTerm::Literal(_) => position == Position::Object,
    };
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidPosition {
            term: term.to_string(),
            position,
        })
    }
}

fn into_subject(term: Term, template: &TemplateTerm) -> Result<Subject, RenderError> {
    match term {
        Term::NamedNode(node) => Ok(node.into()),
        Term::BlankNode(node) => Ok(node.into()),
        Term::Literal(_) => Err(RenderError::InvalidPosition {
            term: template.to_string(),
            position: Position::Subject,
        }),
    }
}

fn into_predicate(term: Term, template: &TemplateTerm) -> Result<NamedNode, RenderError> {
    match term {
        Term::NamedNode(node) => Ok(node),
        Term::BlankNode(_) | Term::Literal(_) => Err(RenderError::InvalidPosition {
            term: template.to_string(),
            position: Position::Predicate,
        }),
    }
}

/// A blank node that is stable for one record and distinct between records.
fn anchored_blank_node(record_id: &str, key: &str) -> BlankNode {
    let id = TermId::digest(&format!("{record_id}\u{0}{key}"));
    BlankNode::new_unchecked(format!("b{}", id.to_hex()))
}
