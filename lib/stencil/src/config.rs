use crate::error::ConfigError;
use rdf_stencil_model::{
    NamespaceTable, PlaceholderVocabulary, DEFAULT_PLACEHOLDER_BASE, DEFAULT_PLACEHOLDER_PREFIX,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings for creating a [`Template`](crate::Template).
///
/// Missing fields in a JSON configuration take their default value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Label used when visualizing the template.
    pub name: String,
    /// Prefix of the placeholder calls, `ll` by default.
    pub placeholder_prefix: String,
    /// Namespace of the synthetic placeholder IRIs.
    pub placeholder_base: String,
    /// Whether `rdf`, `rdfs`, `xsd` and `owl` are bound before the ontology prefixes.
    pub common_namespaces: bool,
}

impl TemplateConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn placeholder(&self) -> PlaceholderVocabulary {
        PlaceholderVocabulary::new(&self.placeholder_prefix, &self.placeholder_base)
    }

    /// Builds the initial namespace table, failing if the placeholder settings are invalid.
    pub fn namespace_table(&self) -> Result<NamespaceTable, ConfigError> {
        let placeholder = self.placeholder();
        Ok(if self.common_namespaces {
            NamespaceTable::with_common_namespaces(placeholder)?
        } else {
            NamespaceTable::new(placeholder)?
        })
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            name: "template".to_owned(),
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_owned(),
            placeholder_base: DEFAULT_PLACEHOLDER_BASE.to_owned(),
            common_namespaces: true,
        }
    }
}
