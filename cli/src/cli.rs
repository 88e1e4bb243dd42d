use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-stencil")]
/// Renders Turtle templates with placeholder slots into RDF
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render records into a template and write the resulting triples
    Render {
        #[command(flatten)]
        template: TemplateArgs,
        /// JSON file with the records to render
        ///
        /// It may hold one object, an array of objects or one object per line.
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        records: Option<PathBuf>,
        /// The format of the output
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        #[arg(short, long, default_value = "nt")]
        format: String,
        /// File to write to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Parse a template and report every error
    Check {
        #[command(flatten)]
        template: TemplateArgs,
    },
    /// Write a template as a Graphviz DOT graph
    Visualize {
        #[command(flatten)]
        template: TemplateArgs,
        /// File to write to
        ///
        /// If no file is given, stdout is written.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

#[derive(ClapArgs)]
pub struct TemplateArgs {
    /// The Turtle template
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub template: PathBuf,
    /// Turtle file whose prefix declarations are bound in the template
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub ontology: Option<PathBuf>,
    /// JSON file with the template configuration
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Prefix of the placeholder calls, overrides the configuration file
    #[arg(long)]
    pub placeholder_prefix: Option<String>,
    /// Namespace of the placeholder IRIs, overrides the configuration file
    #[arg(long, value_hint = ValueHint::Url)]
    pub placeholder_base: Option<String>,
}
