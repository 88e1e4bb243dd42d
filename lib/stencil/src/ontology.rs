use crate::error::{GraphSyntaxError, OntologyError};
use oxttl::{TurtleParseError, TurtleParser};
use rdf_stencil_model::Graph;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// A Turtle document whose namespace declarations seed the namespace table of a template.
///
/// The triples are kept but the template engine only uses the declared prefixes.
#[derive(Clone, Debug, Default)]
pub struct Ontology {
    graph: Graph,
    prefixes: Vec<(String, String)>,
}

impl Ontology {
    /// Parses a Turtle document.
    ///
    /// Fails on the first syntax error.
    pub fn from_reader(reader: impl Read) -> Result<Self, OntologyError> {
        let mut parser = TurtleParser::new().for_reader(reader);
        let mut graph = Graph::new();
        for triple in parser.by_ref() {
            match triple {
                Ok(triple) => {
                    graph.insert(&triple);
                }
                Err(TurtleParseError::Io(error)) => return Err(error.into()),
                Err(TurtleParseError::Syntax(error)) => {
                    return Err(GraphSyntaxError::from_turtle(&error).into())
                }
            }
        }

        let mut prefixes = parser
            .prefixes()
            .map(|(prefix, namespace)| (prefix.to_owned(), namespace.to_owned()))
            .collect::<Vec<_>>();
        prefixes.sort();
        debug!(
            "Loaded ontology with {} triples and {} prefixes",
            graph.len(),
            prefixes.len()
        );
        Ok(Self { graph, prefixes })
    }

    /// Loads the Turtle document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OntologyError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// The `(prefix, namespace)` pairs declared by the document, ordered by prefix.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
