#![allow(clippy::print_stdout)]
use crate::cli::{Args, Command, TemplateArgs};
use anyhow::{bail, Context};
use clap::Parser;
use oxrdfio::{RdfFormat, RdfSerializer};
use rdf_stencil::model::Graph;
use rdf_stencil::{Ontology, Record, Template, TemplateConfig};
use std::fs::{self, File};
use std::io::{self, stdin, stdout, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let matches = Args::parse();
    match matches.command {
        Command::Render {
            template,
            records,
            format,
            output,
        } => {
            let format = rdf_format_from_name(&format)?;
            let template = parsed_template(&template)?;

            let mut input = String::new();
            if let Some(records) = &records {
                File::open(records)
                    .with_context(|| format!("Can not open {}", records.display()))?
                    .read_to_string(&mut input)?;
            } else {
                stdin().lock().read_to_string(&mut input)?;
            }
            let records = Record::parse_json(&input).context("Invalid records")?;
            info!("Rendering {} records", records.len());
            let graph = template.render_all(&records)?;

            if let Some(output) = output {
                close_file_writer(write_graph(
                    &template,
                    &graph,
                    format,
                    BufWriter::new(File::create(output)?),
                )?)
            } else {
                write_graph(&template, &graph, format, stdout().lock())?.flush()
            }?;
            Ok(())
        }
        Command::Check { template: args } => {
            let mut template = new_template(&args)?;
            match template.parse(&read_template(&args.template)?) {
                Ok(()) => {
                    println!("{} is valid", args.template.display());
                    Ok(())
                }
                Err(errors) => {
                    for error in errors.iter() {
                        println!("line {}: {}", error.line(), error.message());
                    }
                    bail!(
                        "The template {} has {} errors",
                        args.template.display(),
                        errors.len()
                    )
                }
            }
        }
        Command::Visualize { template, output } => {
            let dot = parsed_template(&template)?.to_dot();
            if let Some(output) = output {
                fs::write(&output, dot)
                    .with_context(|| format!("Can not write {}", output.display()))?;
            } else {
                stdout().lock().write_all(dot.as_bytes())?;
            }
            Ok(())
        }
    }
}

/// Creates an empty template with the configured namespaces.
fn new_template(args: &TemplateArgs) -> anyhow::Result<Template> {
    let mut config = if let Some(config) = &args.config {
        TemplateConfig::from_json_file(config)
            .with_context(|| format!("Invalid configuration file {}", config.display()))?
    } else {
        let name = args
            .template
            .file_stem()
            .map_or_else(|| "template".into(), |stem| stem.to_string_lossy());
        TemplateConfig::new(name)
    };
    if let Some(prefix) = &args.placeholder_prefix {
        config.placeholder_prefix.clone_from(prefix);
    }
    if let Some(base) = &args.placeholder_base {
        config.placeholder_base.clone_from(base);
    }

    let ontology = args
        .ontology
        .as_ref()
        .map(|path| {
            Ontology::load(path)
                .with_context(|| format!("Can not load the ontology {}", path.display()))
        })
        .transpose()?;
    Ok(Template::from_config(&config, ontology.as_ref())?)
}

fn parsed_template(args: &TemplateArgs) -> anyhow::Result<Template> {
    let mut template = new_template(args)?;
    template
        .parse(&read_template(&args.template)?)
        .with_context(|| format!("Invalid template {}", args.template.display()))?;
    debug!(
        "Template {} needs the fields {:?}",
        template.name(),
        template.slots()
    );
    Ok(template)
}

fn read_template(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Can not read {}", path.display()))
}

fn write_graph<W: Write>(
    template: &Template,
    graph: &Graph,
    format: RdfFormat,
    writer: W,
) -> anyhow::Result<W> {
    let mut serializer = RdfSerializer::from_format(format);
    let placeholder = template.namespaces().placeholder().prefix();
    for (prefix, namespace) in template.namespaces().iter() {
        if prefix != placeholder {
            serializer = serializer
                .with_prefix(prefix, namespace)
                .with_context(|| format!("Invalid IRI for prefix {prefix}: {namespace}"))?;
        }
    }
    let mut serializer = serializer.for_writer(writer);
    for triple in graph {
        serializer.serialize_triple(triple)?;
    }
    Ok(serializer.finish()?)
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}

fn close_file_writer(writer: BufWriter<File>) -> io::Result<()> {
    let mut file = writer
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    file.flush()?;
    file.sync_all()
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::NamedTempFile;
    use predicates::prelude::*;

    const TEMPLATE: &str = "@prefix ex: <http://example.com/> .\n\
        ll:uri(dog) a ex:Dog ;\n\
        \tex:name ll:literal(name) .\n";

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command.arg("run").arg("--bin").arg("rdf-stencil");
        command.arg("--");
        command
    }

    fn template_file(content: &str) -> Result<NamedTempFile> {
        let file = NamedTempFile::new("dogs.ttl")?;
        file.write_str(content)?;
        Ok(file)
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("rdf-stencil"));
    }

    #[test]
    fn cli_render_stdin() -> Result<()> {
        let template = template_file(TEMPLATE)?;
        cli_command()
            .arg("render")
            .arg("--template")
            .arg(template.path())
            .write_stdin(r#"{"dog": "http://example.com/rex", "name": "Rex"}"#)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "<http://example.com/rex> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.com/Dog> .\n",
            ))
            .stdout(predicate::str::contains(
                "<http://example.com/rex> <http://example.com/name> \"Rex\" .\n",
            ));
        Ok(())
    }

    #[test]
    fn cli_render_file_with_ontology() -> Result<()> {
        let template = template_file(TEMPLATE)?;
        let ontology = NamedTempFile::new("ontology.ttl")?;
        ontology.write_str("@prefix ex: <http://example.com/> .\nex:Dog a ex:Class .\n")?;
        let records = NamedTempFile::new("records.json")?;
        records.write_str(
            "{\"dog\": \"ex:rex\", \"name\": \"Rex\"}\n{\"dog\": \"ex:fido\", \"name\": \"Fido\"}\n",
        )?;
        let output = NamedTempFile::new("output.ttl")?;
        cli_command()
            .arg("render")
            .arg("--template")
            .arg(template.path())
            .arg("--ontology")
            .arg(ontology.path())
            .arg("--records")
            .arg(records.path())
            .arg("--format")
            .arg("ttl")
            .arg("--output")
            .arg(output.path())
            .assert()
            .success();
        output.assert(predicate::str::contains("@prefix ex: <http://example.com/> ."));
        output.assert(predicate::str::contains("ex:fido"));
        output.assert(predicate::str::contains("lodlord").not());
        Ok(())
    }

    #[test]
    fn cli_render_missing_field() -> Result<()> {
        let template = template_file(TEMPLATE)?;
        cli_command()
            .arg("render")
            .arg("--template")
            .arg(template.path())
            .write_stdin(r#"{"dog": "http://example.com/rex"}"#)
            .assert()
            .failure()
            .stderr(predicate::str::contains("'name'"));
        Ok(())
    }

    #[test]
    fn cli_check() -> Result<()> {
        let template = template_file("# dogs\nll:uri(dog) a ll:graph(x) .\n")?;
        cli_command()
            .arg("check")
            .arg("--template")
            .arg(template.path())
            .assert()
            .failure()
            .stdout(predicate::str::starts_with("line 2: Unknown placeholder function"));

        let template = template_file(TEMPLATE)?;
        cli_command()
            .arg("check")
            .arg("--template")
            .arg(template.path())
            .assert()
            .success();
        Ok(())
    }

    #[test]
    fn cli_check_placeholder_prefix() -> Result<()> {
        let template = template_file("tpl:uri(dog) a <http://example.com/Dog> .\n")?;
        cli_command()
            .arg("check")
            .arg("--template")
            .arg(template.path())
            .arg("--placeholder-prefix")
            .arg("tpl")
            .assert()
            .success();
        Ok(())
    }

    #[test]
    fn cli_visualize() -> Result<()> {
        let template = template_file(TEMPLATE)?;
        let config = NamedTempFile::new("config.json")?;
        config.write_str(r#"{"name": "kennel"}"#)?;
        cli_command()
            .arg("visualize")
            .arg("--template")
            .arg(template.path())
            .arg("--config")
            .arg(config.path())
            .assert()
            .success()
            .stdout(predicate::str::starts_with("digraph template {"))
            .stdout(predicate::str::contains("label=\"kennel\""))
            .stdout(predicate::str::contains("fontcolor=red"));
        Ok(())
    }
}
