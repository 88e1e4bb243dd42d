use crate::builder::TermBuilder;
use crate::config::TemplateConfig;
use crate::dot::DotWriter;
use crate::error::{ConfigError, GraphSyntaxError, ParseError, ParseErrors, RenderError};
use crate::ontology::Ontology;
use crate::preprocess::Preprocessor;
use crate::record::FieldSource;
use crate::render::Renderer;
use oxttl::TurtleParser;
use rdf_stencil_model::{Graph, NamespaceError, NamespaceTable, RelationIndex, TermTable};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A Turtle template with placeholder slots.
///
/// A template is parsed once and can then be rendered for any number of records. Parsing
/// replaces the previous content, rendering only reads it.
///
/// ```
/// use rdf_stencil::{Record, Template, TemplateConfig};
///
/// let mut template = Template::from_config(&TemplateConfig::default(), None)?;
/// template.parse("<http://example.com/rex> a ll:uri(class) .")?;
///
/// let record = Record::new().with_field("class", vec!["owl:Thing", "rdfs:Resource"]);
/// assert_eq!(template.render(&record)?.len(), 2);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    namespaces: NamespaceTable,
    terms: TermTable,
    relations: RelationIndex,
    errors: Vec<ParseError>,
}

impl Template {
    /// Creates an empty template that uses `namespaces` for parsing and display.
    pub fn new(name: impl Into<String>, namespaces: NamespaceTable) -> Self {
        Self {
            name: name.into(),
            namespaces,
            terms: TermTable::new(),
            relations: RelationIndex::new(),
            errors: Vec::new(),
        }
    }

    /// Creates an empty template from `config`, binding the prefixes declared by `ontology`.
    ///
    /// Ontology prefixes that are invalid or collide with the placeholder prefix are skipped.
    pub fn from_config(
        config: &TemplateConfig,
        ontology: Option<&Ontology>,
    ) -> Result<Self, ConfigError> {
        let mut namespaces = config.namespace_table()?;
        for (prefix, namespace) in ontology.into_iter().flat_map(Ontology::prefixes) {
            if let Err(error) = namespaces.bind(prefix, namespace) {
                warn!("Skipping the ontology prefix {prefix}: {error}");
            }
        }
        Ok(Self::new(config.name.as_str(), namespaces))
    }

    /// Parses `text`, replacing the current content of the template.
    ///
    /// Returns every error of this attempt. The errors are also appended to [Self::errors], and
    /// the template is left empty.
    pub fn parse(&mut self, text: &str) -> Result<(), ParseErrors> {
        self.terms.clear();
        self.relations.clear();

        let preprocessed = Preprocessor::new(&self.namespaces).preprocess(text);
        let errors = if preprocessed.is_ok() {
            self.build(&preprocessed.text)
        } else {
            preprocessed.errors.into_iter().map(ParseError::from).collect()
        };

        if errors.is_empty() {
            debug!(
                "Parsed template {} with {} placeholder calls into {} terms and {} edges",
                self.name,
                preprocessed.calls,
                self.terms.len(),
                self.relations.len()
            );
            return Ok(());
        }

        self.terms.clear();
        self.relations.clear();
        self.errors.extend(errors.iter().cloned());
        debug!(
            "Parsing template {} failed with {} errors",
            self.name,
            errors.len()
        );
        Err(ParseErrors(errors))
    }

    fn build(&mut self, text: &str) -> Vec<ParseError> {
        let mut errors = Vec::new();
        let mut builder = TermBuilder::new(&self.namespaces);
        for triple in self.turtle_parser().for_slice(text.as_bytes()) {
            match triple {
                Ok(triple) => builder.add_triple(triple),
                Err(error) => errors.push(GraphSyntaxError::from_turtle(&error).into()),
            }
        }
        let (terms, relations) = builder.finish();
        self.terms = terms;
        self.relations = relations;
        errors
    }

    /// A Turtle parser that knows every prefix of the namespace table.
    fn turtle_parser(&self) -> TurtleParser {
        let mut parser = TurtleParser::new();
        for (prefix, namespace) in self.namespaces.iter() {
            match parser.clone().with_prefix(prefix, namespace) {
                Ok(with_prefix) => parser = with_prefix,
                Err(error) => warn!("Can not declare the prefix {prefix}: {error}"),
            }
        }
        parser
    }

    /// Every parse error since the template was created or [Self::clear_errors] was called.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Renders the template for `record`.
    pub fn render<R: FieldSource + ?Sized>(&self, record: &R) -> Result<Graph, RenderError> {
        self.renderer().render(record)
    }

    /// Renders the template for each record into one graph.
    ///
    /// Stops at the first record that fails to render.
    pub fn render_all<'a, R: FieldSource + 'a>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
    ) -> Result<Graph, RenderError> {
        let renderer = self.renderer();
        let mut graph = Graph::new();
        for record in records {
            renderer.render_into(record, &mut graph)?;
        }
        Ok(graph)
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.namespaces, &self.terms, &self.relations)
    }

    /// The sorted names of all fields a record must provide.
    pub fn slots(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter_map(|(_, term)| term.slot())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The template as a Graphviz DOT document.
    pub fn to_dot(&self) -> String {
        DotWriter::new(&self.name, &self.terms, &self.relations).to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn terms(&self) -> &TermTable {
        &self.terms
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Binds `prefix` for later parses and for `uri` field values.
    pub fn bind(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<(), NamespaceError> {
        self.namespaces.bind(prefix, namespace)
    }

    pub fn shorten(&self, iri: &str) -> String {
        self.namespaces.shorten(iri)
    }

    pub fn lengthen(&self, short: &str) -> String {
        self.namespaces.lengthen(short)
    }
}
