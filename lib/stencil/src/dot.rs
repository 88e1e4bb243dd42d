use rdf_stencil_model::{RelationIndex, TemplateTerm, TermId, TermTable};
use std::fmt;

/// Writes the terms and edges of a template as a Graphviz DOT document.
///
/// Terms that only occur as predicates are drawn as edge labels. Placeholder terms use a red
/// font. Nodes and edges are ordered by term id so the output is stable.
pub struct DotWriter<'template> {
    name: &'template str,
    terms: &'template TermTable,
    relations: &'template RelationIndex,
}

impl<'template> DotWriter<'template> {
    pub fn new(
        name: &'template str,
        terms: &'template TermTable,
        relations: &'template RelationIndex,
    ) -> Self {
        Self {
            name,
            terms,
            relations,
        }
    }

    /// The sorted ids of the terms in subject or object position.
    fn node_ids(&self) -> Vec<TermId> {
        let mut ids = self
            .relations
            .edges()
            .flat_map(|(subject, _, object)| [subject, object])
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl fmt::Display for DotWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph template {{")?;
        writeln!(f, "  label=\"{}\";", escape(self.name))?;
        writeln!(f, "  rankdir=LR;")?;

        let nodes = self.node_ids();
        for term in self.terms.sorted() {
            if nodes.binary_search(&term.id()).is_ok() {
                writeln!(
                    f,
                    "  {} [label=\"{}\", {}];",
                    node_name(term.id()),
                    escape(&term.to_string()),
                    node_style(term)
                )?;
            }
        }

        for (subject, predicate, object) in self.relations.sorted_edges() {
            let (label, color) = match self.terms.get(&predicate) {
                Some(term) => (term.to_string(), font_color(term)),
                None => (predicate.to_hex(), "black"),
            };
            writeln!(
                f,
                "  {} -> {} [label=\"{}\", fontcolor={color}];",
                node_name(subject),
                node_name(object),
                escape(&label)
            )?;
        }

        writeln!(f, "}}")
    }
}

fn node_name(id: TermId) -> String {
    format!("n{}", id.to_hex())
}

fn node_style(term: &TemplateTerm) -> String {
    let shape = match term {
        TemplateTerm::Uri(_) => "shape=ellipse, style=solid",
        TemplateTerm::Blank(_) => "shape=ellipse, style=dashed",
        TemplateTerm::Literal(_) => "shape=box, style=filled, fillcolor=lightgrey",
    };
    format!("{shape}, fontcolor={}", font_color(term))
}

fn font_color(term: &TemplateTerm) -> &'static str {
    if term.is_placeholder() {
        "red"
    } else {
        "black"
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
