use oxiri::IriParseError;

/// An error raised while binding a prefix in a [`NamespaceTable`](crate::NamespaceTable).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NamespaceError {
    /// The prefix is reserved for placeholder calls.
    #[error("The prefix '{0}' is reserved for placeholder calls")]
    ReservedPrefix(String),
    /// The prefix is not a valid Turtle prefix name.
    #[error("'{0}' is not a valid prefix name")]
    InvalidPrefix(String),
    /// The namespace is not an absolute IRI.
    #[error("Invalid namespace IRI '{namespace}': {error}")]
    InvalidNamespace {
        /// The namespace itself.
        namespace: String,
        /// The parsing error.
        #[source]
        error: IriParseError,
    },
}
