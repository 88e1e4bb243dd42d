use std::fmt::{Display, Formatter};

/// The prefix reserved for placeholder calls if nothing else is configured.
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "ll";
/// The namespace of the placeholder vocabulary if nothing else is configured.
pub const DEFAULT_PLACEHOLDER_BASE: &str = "http://lodlord/";

/// The prefix and namespace IRI reserved for placeholder calls.
///
/// A call such as `ll:uri(name)` is rewritten into an IRI below [Self::base] and decoded again
/// after parsing. The prefix is only used for the textual call syntax.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaceholderVocabulary {
    prefix: String,
    base: String,
}

impl PlaceholderVocabulary {
    pub fn new(prefix: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            base: base.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Encodes `call` as a synthetic IRI within this vocabulary.
    pub fn encode(&self, call: &PlaceholderCall) -> String {
        let mut iri = format!("{}{}?v={}", self.base, call.function, call.slot);
        if let Some(datatype) = &call.datatype {
            iri.push_str("&type=");
            iri.push_str(datatype);
        }
        if let Some(language) = &call.language {
            iri.push_str("&lang=");
            iri.push_str(language);
        }
        iri
    }

    /// Decodes a synthetic IRI produced by [Self::encode].
    ///
    /// Returns `None` if the IRI is outside of the vocabulary, names an unknown function, or
    /// lacks the `v` parameter. Unknown query parameters are ignored.
    pub fn decode(&self, iri: &str) -> Option<PlaceholderCall> {
        let rest = iri.strip_prefix(&self.base)?;
        let (path, query) = rest.split_once('?')?;
        let function = PlaceholderFunction::from_name(path.trim_matches('/'))?;

        let mut slot = None;
        let mut datatype = None;
        let mut language = None;
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "v" => slot = Some(value.to_owned()),
                "type" => datatype = Some(value.to_owned()),
                "lang" => language = Some(value.to_owned()),
                _ => {}
            }
        }

        Some(PlaceholderCall {
            function,
            slot: slot.filter(|s| !s.is_empty())?,
            datatype: datatype.filter(|s| !s.is_empty()),
            language: language.filter(|s| !s.is_empty()),
        })
    }

    /// Renders `call` in the textual syntax, e.g. `ll:literal(name,type=xsd:string)`.
    pub fn display_call(&self, call: &PlaceholderCall) -> String {
        format!("{}:{}", self.prefix, call)
    }
}

impl Default for PlaceholderVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_PREFIX, DEFAULT_PLACEHOLDER_BASE)
    }
}

/// The functions of the placeholder vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceholderFunction {
    /// `uri(v)`: a named node taken from the slot `v`.
    Uri,
    /// `blank(v)`: a blank node identified by the slot `v`.
    Blank,
    /// `literal(v, type=T, lang=L)`: a literal whose lexical value is taken from the slot `v`.
    Literal,
}

impl PlaceholderFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "uri" => Some(Self::Uri),
            "blank" => Some(Self::Blank),
            "literal" => Some(Self::Literal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Blank => "blank",
            Self::Literal => "literal",
        }
    }

    /// The keyword arguments accepted by this function.
    pub fn accepted_keys(self) -> &'static [&'static str] {
        match self {
            Self::Uri | Self::Blank => &["v"],
            Self::Literal => &["v", "type", "lang"],
        }
    }
}

impl Display for PlaceholderFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded placeholder call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaceholderCall {
    pub function: PlaceholderFunction,
    pub slot: String,
    /// The `type` argument as written by the author (short or long form).
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl PlaceholderCall {
    pub fn new(function: PlaceholderFunction, slot: impl Into<String>) -> Self {
        Self {
            function,
            slot: slot.into(),
            datatype: None,
            language: None,
        }
    }

    #[must_use]
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl Display for PlaceholderCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}", self.function, self.slot)?;
        if let Some(datatype) = &self.datatype {
            write!(f, ",type={datatype}")?;
        }
        if let Some(language) = &self.language {
            write!(f, ",lang={language}")?;
        }
        f.write_str(")")
    }
}
