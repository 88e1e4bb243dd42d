#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod builder;
mod config;
mod dot;
mod error;
mod ontology;
mod preprocess;
mod record;
mod render;
mod template;

pub use builder::TermBuilder;
pub use config::TemplateConfig;
pub use dot::DotWriter;
pub use error::*;
pub use ontology::Ontology;
pub use preprocess::{Preprocessed, Preprocessor};
pub use record::{FieldSource, FieldValue, Record};
pub use render::Renderer;
pub use template::Template;

pub mod model {
    pub use rdf_stencil_model::*;
}
