use md5::{Digest, Md5};
use std::fmt::{Debug, Display, Formatter};

/// The content-addressed identity of a [TemplateTerm].
///
/// Named and blank nodes are identified by the MD5 digest of their canonical string, hence the
/// same IRI always maps to the same id. Literals are identified by a token that is unique within
/// one parse.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId([u8; TermId::SIZE]);

impl TermId {
    pub const SIZE: usize = 16;

    /// Hashes `canonical` into an id.
    pub fn digest(canonical: &str) -> Self {
        let digest = Md5::digest(canonical.as_bytes());
        let mut bytes = [0u8; TermId::SIZE];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn for_named_node(iri: &str) -> Self {
        Self::digest(&format!("<{iri}>"))
    }

    pub fn for_blank_node(id: &str) -> Self {
        Self::digest(&format!("_:{id}"))
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self.to_hex())
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A named node of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriTerm {
    pub id: TermId,
    pub uri: String,
    pub short_uri: String,
    /// If set, the IRI is taken from this record field at render time.
    pub slot: Option<String>,
    /// Set if the term has been observed in predicate position.
    pub is_predicate: bool,
}

/// A blank node of a template.
///
/// Unslotted blank nodes are instantiated once per record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlankTerm {
    pub id: TermId,
    /// The synthetic IRI for placeholders or the parser's blank node id otherwise.
    pub uri: String,
    pub short_uri: String,
    pub slot: Option<String>,
    pub is_predicate: bool,
}

/// A literal of a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralTerm {
    pub id: TermId,
    /// The lexical value. Empty for placeholders.
    pub value: String,
    /// Long form of the datatype. `None` for simple and language-tagged literals.
    pub data_type: Option<String>,
    pub short_data_type: Option<String>,
    pub lang: Option<String>,
    /// The synthetic IRI if this literal is a placeholder.
    pub uri: Option<String>,
    pub short_uri: Option<String>,
    pub slot: Option<String>,
    pub is_predicate: bool,
}

/// A node of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateTerm {
    Uri(UriTerm),
    Blank(BlankTerm),
    Literal(LiteralTerm),
}

impl TemplateTerm {
    pub fn id(&self) -> TermId {
        match self {
            Self::Uri(term) => term.id,
            Self::Blank(term) => term.id,
            Self::Literal(term) => term.id,
        }
    }

    /// The record field driving this term, if it is a placeholder.
    pub fn slot(&self) -> Option<&str> {
        match self {
            Self::Uri(term) => term.slot.as_deref(),
            Self::Blank(term) => term.slot.as_deref(),
            Self::Literal(term) => term.slot.as_deref(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.slot().is_some()
    }

    pub fn is_predicate(&self) -> bool {
        match self {
            Self::Uri(term) => term.is_predicate,
            Self::Blank(term) => term.is_predicate,
            Self::Literal(term) => term.is_predicate,
        }
    }

    pub fn mark_predicate(&mut self) {
        match self {
            Self::Uri(term) => term.is_predicate = true,
            Self::Blank(term) => term.is_predicate = true,
            Self::Literal(term) => term.is_predicate = true,
        }
    }
}

impl Display for TemplateTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uri(term) => f.write_str(&term.short_uri),
            Self::Blank(term) => {
                if term.slot.is_some() {
                    f.write_str(&term.short_uri)
                } else {
                    write!(f, "_:{}", term.short_uri)
                }
            }
            Self::Literal(term) => {
                let value = match (&term.slot, &term.short_uri) {
                    (Some(_), Some(short_uri)) => short_uri.as_str(),
                    _ => term.value.as_str(),
                };
                if let Some(data_type) = term.short_data_type.as_ref().or(term.data_type.as_ref()) {
                    write!(f, "{value}^^{data_type}")
                } else if let Some(lang) = &term.lang {
                    write!(f, "{value}@{lang}")
                } else {
                    f.write_str(value)
                }
            }
        }
    }
}
