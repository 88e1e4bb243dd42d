use oxttl::TurtleSyntaxError;
use rdf_stencil_model::NamespaceError;
use std::fmt::{Display, Formatter};
use std::io;

/// A malformed placeholder call in the template text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Template syntax error on line {line}: {message}")]
pub struct TemplateSyntaxError {
    /// 1-based line in the template text.
    pub line: usize,
    pub message: String,
}

impl TemplateSyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// The Turtle parser rejected the rewritten template text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Graph syntax error on line {line}: {message}")]
pub struct GraphSyntaxError {
    /// 1-based line in the template text.
    pub line: usize,
    pub message: String,
}

impl GraphSyntaxError {
    pub(crate) fn from_turtle(error: &TurtleSyntaxError) -> Self {
        Self {
            line: usize::try_from(error.location().start.line)
                .unwrap_or(usize::MAX)
                .saturating_add(1),
            message: error.message().to_owned(),
        }
    }
}

/// An error collected while parsing a template.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Template(#[from] TemplateSyntaxError),
    #[error(transparent)]
    Graph(#[from] GraphSyntaxError),
}

impl ParseError {
    /// The 1-based line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::Template(error) => error.line,
            Self::Graph(error) => error.line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Template(error) => &error.message,
            Self::Graph(error) => &error.message,
        }
    }
}

/// All errors of one failed parse attempt, in the order they were found.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ParseErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "The template could not be parsed ({} errors)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

/// The position of a term within a template edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Subject,
    Predicate,
    Object,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
        })
    }
}

/// An error raised by a [`FieldSource`](crate::FieldSource) lookup.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FieldError {
    #[error("The field '{0}' does not exist")]
    FieldNotFound(String),
}

/// An error raised while rendering a record.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The record does not provide the field of a slot.
    #[error("The record has no field '{slot}' required by {term} in {position} position")]
    FieldMissing {
        slot: String,
        /// The display form of the template term.
        term: String,
        position: Position,
    },
    /// A field value can not be substituted into its template term.
    #[error("The value '{value}' of field '{slot}' is not valid for {term}: {reason}")]
    InvalidValue {
        slot: String,
        value: String,
        term: String,
        reason: String,
    },
    /// The template term can not be instantiated in this position.
    #[error("{term} can not be used in {position} position")]
    InvalidPosition { term: String, position: Position },
    /// The relation index refers to a term that is not in the term table.
    #[error("The template refers to the unknown term {0}")]
    UnknownTerm(String),
}

/// An error raised while converting external data into a [`Record`](crate::Record).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error("A record must be a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("The field '{field}' holds an unsupported value: {reason}")]
    UnsupportedValue { field: String, reason: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// An error raised while loading an [`Ontology`](crate::Ontology).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OntologyError {
    /// Error from the OS I/O layer.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The ontology is not valid Turtle.
    #[error(transparent)]
    Syntax(#[from] GraphSyntaxError),
}

/// An invalid [`TemplateConfig`](crate::TemplateConfig).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Namespace(#[from] NamespaceError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
