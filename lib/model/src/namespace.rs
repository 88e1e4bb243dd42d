use crate::{NamespaceError, PlaceholderVocabulary};
use bimap::BiBTreeMap;
use oxiri::Iri;

/// Vocabularies bound in every namespace table unless disabled.
pub const COMMON_NAMESPACES: [(&str, &str); 4] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
];

/// A bidirectional mapping between prefixes and namespace IRIs.
///
/// A prefix is bound to at most one namespace and a namespace to at most one prefix. Binding a
/// prefix or a namespace again replaces the previous binding. The placeholder prefix is reserved
/// and can not be rebound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: BiBTreeMap<String, String>,
    placeholder: PlaceholderVocabulary,
}

impl NamespaceTable {
    /// Creates a table that only contains the reserved placeholder binding.
    pub fn new(placeholder: PlaceholderVocabulary) -> Result<Self, NamespaceError> {
        if placeholder.prefix().is_empty() {
            return Err(NamespaceError::InvalidPrefix(String::new()));
        }
        validate_prefix(placeholder.prefix())?;
        validate_namespace(placeholder.base())?;
        let mut bindings = BiBTreeMap::new();
        bindings.insert(
            placeholder.prefix().to_owned(),
            placeholder.base().to_owned(),
        );
        Ok(Self {
            bindings,
            placeholder,
        })
    }

    /// Creates a table with the reserved placeholder binding and [COMMON_NAMESPACES].
    pub fn with_common_namespaces(
        placeholder: PlaceholderVocabulary,
    ) -> Result<Self, NamespaceError> {
        let mut table = Self::new(placeholder)?;
        for (prefix, namespace) in COMMON_NAMESPACES {
            table.bind(prefix, namespace)?;
        }
        Ok(table)
    }

    pub fn placeholder(&self) -> &PlaceholderVocabulary {
        &self.placeholder
    }

    /// Binds `prefix` to `namespace`, replacing existing bindings of either.
    pub fn bind(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<(), NamespaceError> {
        let prefix = prefix.into();
        let namespace = namespace.into();
        validate_prefix(&prefix)?;
        validate_namespace(&namespace)?;
        if prefix == self.placeholder.prefix() || namespace == self.placeholder.base() {
            return Err(NamespaceError::ReservedPrefix(prefix));
        }
        self.bindings.insert(prefix, namespace);
        Ok(())
    }

    /// Returns the namespace bound to `prefix`.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings.get_by_left(prefix).map(String::as_str)
    }

    /// Returns the prefix bound to `namespace`.
    pub fn prefix_of(&self, namespace: &str) -> Option<&str> {
        self.bindings.get_by_right(namespace).map(String::as_str)
    }

    /// Iterates over `(prefix, namespace)` pairs ordered by prefix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Converts a full IRI into its display form.
    ///
    /// Placeholder IRIs are rendered back into the call syntax, e.g. `ll:uri(name)`. Other IRIs
    /// are compacted with the longest matching namespace. If no namespace matches or the remainder
    /// contains characters that would make the short form ambiguous, the IRI is returned
    /// unchanged.
    pub fn shorten(&self, iri: &str) -> String {
        if let Some(call) = self.placeholder.decode(iri) {
            return self.placeholder.display_call(&call);
        }

        self.bindings
            .iter()
            .filter(|(_, namespace)| iri.starts_with(namespace.as_str()))
            .max_by_key(|(_, namespace)| namespace.len())
            .and_then(|(prefix, namespace)| {
                let local = &iri[namespace.len()..];
                is_local_name(local).then(|| format!("{prefix}:{local}"))
            })
            .unwrap_or_else(|| iri.to_owned())
    }

    /// Expands a `prefix:suffix` form into a full IRI.
    ///
    /// Splits on the first colon. Input without a colon, or with a prefix that is not bound, is
    /// returned unchanged.
    pub fn lengthen(&self, short: &str) -> String {
        let Some((prefix, suffix)) = short.split_once(':') else {
            return short.to_owned();
        };
        match self.resolve(prefix) {
            Some(namespace) => format!("{namespace}{suffix}"),
            None => short.to_owned(),
        }
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        let placeholder = PlaceholderVocabulary::default();
        let mut bindings = BiBTreeMap::new();
        bindings.insert(
            placeholder.prefix().to_owned(),
            placeholder.base().to_owned(),
        );
        for (prefix, namespace) in COMMON_NAMESPACES {
            bindings.insert(prefix.to_owned(), namespace.to_owned());
        }
        Self {
            bindings,
            placeholder,
        }
    }
}

fn validate_prefix(prefix: &str) -> Result<(), NamespaceError> {
    let mut chars = prefix.chars();
    let valid = chars.next().is_some_and(char::is_alphabetic)
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        || prefix.is_empty();
    if valid {
        Ok(())
    } else {
        Err(NamespaceError::InvalidPrefix(prefix.to_owned()))
    }
}

fn validate_namespace(namespace: &str) -> Result<(), NamespaceError> {
    Iri::parse(namespace).map_err(|error| NamespaceError::InvalidNamespace {
        namespace: namespace.to_owned(),
        error,
    })?;
    Ok(())
}

/// Checks that `local` reads unambiguously after `prefix:`.
fn is_local_name(local: &str) -> bool {
    !local.chars().any(|c| {
        c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    })
}
