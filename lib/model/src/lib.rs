mod error;
mod index;
mod namespace;
mod placeholder;
mod term;

pub use error::*;
pub use index::*;
pub use namespace::*;
pub use placeholder::*;
pub use term::*;

// Re-export some oxrdf types.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::{
    BlankNode, BlankNodeIdParseError, Graph, LanguageTagParseError, Literal, NamedNode,
    NamedNodeRef, Subject, Term, TermRef, Triple, TripleRef,
};
pub use oxrdf::vocab;
