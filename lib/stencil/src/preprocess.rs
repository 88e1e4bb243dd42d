//! Rewrites placeholder calls such as `ll:literal(name, lang=en)` into synthetic IRIs that the
//! Turtle parser accepts.
//!
//! The rewrite works line by line and never adds or removes line breaks, hence line numbers
//! reported by the Turtle parser still point into the original template text. IRIs, string
//! literals and comments are copied verbatim.

use crate::error::TemplateSyntaxError;
use rdf_stencil_model::{Iri, NamespaceTable, PlaceholderCall, PlaceholderFunction};

/// The result of [Preprocessor::preprocess].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preprocessed {
    /// The rewritten text. Malformed calls are copied unchanged.
    pub text: String,
    pub errors: Vec<TemplateSyntaxError>,
    /// The number of rewritten calls.
    pub calls: usize,
}

impl Preprocessed {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexState {
    Code,
    /// Within a `"""` or `'''` string that continues on the next line.
    LongString(u8),
}

/// Rewrites the placeholder calls of the table's placeholder vocabulary.
///
/// Datatypes given with `type=` must be prefixed names whose prefix is bound in the table.
#[derive(Clone, Copy, Debug)]
pub struct Preprocessor<'namespaces> {
    namespaces: &'namespaces NamespaceTable,
}

impl<'namespaces> Preprocessor<'namespaces> {
    pub fn new(namespaces: &'namespaces NamespaceTable) -> Self {
        Self { namespaces }
    }

    pub fn preprocess(&self, text: &str) -> Preprocessed {
        let mut result = Preprocessed {
            text: String::with_capacity(text.len()),
            ..Preprocessed::default()
        };
        let mut state = LexState::Code;
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                result.text.push('\n');
            }
            state = self.rewrite_line(line, index + 1, state, &mut result);
        }
        result
    }

    fn rewrite_line(
        &self,
        line: &str,
        line_number: usize,
        mut state: LexState,
        result: &mut Preprocessed,
    ) -> LexState {
        let bytes = line.as_bytes();
        let mut copied_until = 0;
        let mut i = 0;

        if let LexState::LongString(quote) = state {
            match find_long_string_end(bytes, 0, quote) {
                Some(end) => {
                    i = end;
                    state = LexState::Code;
                }
                None => {
                    result.text.push_str(line);
                    return state;
                }
            }
        }

        while i < bytes.len() {
            match bytes[i] {
                b'#' => break,
                b'<' => {
                    i = bytes[i + 1..]
                        .iter()
                        .position(|b| *b == b'>')
                        .map_or(bytes.len(), |offset| i + offset + 2);
                }
                quote @ (b'"' | b'\'') => {
                    if bytes[i..].starts_with(&[quote, quote, quote]) {
                        if let Some(end) = find_long_string_end(bytes, i + 3, quote) {
                            i = end;
                        } else {
                            state = LexState::LongString(quote);
                            break;
                        }
                    } else {
                        i = find_short_string_end(bytes, i + 1, quote);
                    }
                }
                _ => {
                    let Some(name) = self.call_name_at(line, i) else {
                        i += 1;
                        continue;
                    };
                    let parsed = parse_call(line, i, name).and_then(|(end, call)| {
                        self.check_datatype(&call)
                            .map(|()| (end, call))
                            .map_err(|message| (end, format!("{message} in '{}'", &line[i..end])))
                    });
                    match parsed {
                        Ok((end, call)) => {
                            result.text.push_str(&line[copied_until..i]);
                            result.text.push('<');
                            result.text.push_str(&self.namespaces.placeholder().encode(&call));
                            result.text.push('>');
                            result.calls += 1;
                            copied_until = end;
                            i = end;
                        }
                        Err((end, message)) => {
                            result
                                .errors
                                .push(TemplateSyntaxError::new(line_number, message));
                            i = end;
                        }
                    }
                }
            }
        }

        result.text.push_str(&line[copied_until..]);
        state
    }

    /// Returns the byte range of the function name if a call `prefix:name(` starts at `start`.
    fn call_name_at(&self, line: &str, start: usize) -> Option<(usize, usize)> {
        // Byte-wise comparison as `start` may point into a multi-byte character.
        let bytes = line.as_bytes();
        let prefix = self.namespaces.placeholder().prefix().as_bytes();
        if !bytes[start..].starts_with(prefix) || bytes.get(start + prefix.len()) != Some(&b':') {
            return None;
        }
        if start > 0 && is_name_byte(bytes[start - 1]) {
            return None;
        }
        let name_start = start + prefix.len() + 1;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        let name_end = name_start + name_len;
        if name_len == 0 || bytes.get(name_end) != Some(&b'(') {
            return None;
        }
        Some((name_start, name_end))
    }

    /// Checks that the datatype of `call` expands to an absolute IRI.
    fn check_datatype(&self, call: &PlaceholderCall) -> Result<(), String> {
        let Some(datatype) = &call.datatype else {
            return Ok(());
        };
        let Some((prefix, _)) = datatype.split_once(':') else {
            return Err(format!("Datatype '{datatype}' must be a prefixed name"));
        };
        if self.namespaces.resolve(prefix).is_none() {
            return Err(format!(
                "Datatype '{datatype}' uses the unbound prefix '{prefix}'"
            ));
        }
        Iri::parse(self.namespaces.lengthen(datatype))
            .map(|_| ())
            .map_err(|error| format!("Datatype '{datatype}' is not a valid IRI: {error}"))
    }
}

/// Parses the call starting at `start`. On success, returns the end of the call and the decoded
/// call. On failure, returns the position to continue scanning at and a message.
fn parse_call(
    line: &str,
    start: usize,
    (name_start, name_end): (usize, usize),
) -> Result<(usize, PlaceholderCall), (usize, String)> {
    let Some(close) = line[name_end..].find(')').map(|offset| name_end + offset) else {
        return Err((
            line.len(),
            format!("Unterminated placeholder call '{}'", &line[start..]),
        ));
    };
    let end = close + 1;
    let text = &line[start..end];
    let name = &line[name_start..name_end];

    let Some(function) = PlaceholderFunction::from_name(name) else {
        return Err((
            end,
            format!("Unknown placeholder function '{name}' in '{text}'"),
        ));
    };
    parse_arguments(function, &line[name_end + 1..close])
        .map(|call| (end, call))
        .map_err(|message| (end, format!("{message} in '{text}'")))
}

fn parse_arguments(function: PlaceholderFunction, raw: &str) -> Result<PlaceholderCall, String> {
    if raw.trim().is_empty() {
        return Err("Missing slot argument 'v'".to_owned());
    }

    let mut slot = None;
    let mut datatype = None;
    let mut language = None;
    for (position, raw_argument) in raw.split(',').enumerate() {
        let argument = raw_argument.trim();
        let (key, value) = match argument.split('=').collect::<Vec<_>>().as_slice() {
            [value] if position == 0 => ("v", value.trim()),
            [_] => {
                return Err(format!(
                    "Argument '{argument}' must be written as key=value"
                ))
            }
            [key, value] => (key.trim(), value.trim()),
            _ => return Err(format!("Malformed argument '{argument}'")),
        };
        if key.is_empty() || value.is_empty() {
            return Err(format!("Malformed argument '{argument}'"));
        }
        if !function.accepted_keys().contains(&key) {
            return Err(format!(
                "Unsupported argument '{key}' for placeholder function '{function}'"
            ));
        }

        let (target, is_valid): (&mut Option<String>, fn(char) -> bool) = match key {
            "v" => (&mut slot, is_slot_char),
            "type" => (&mut datatype, is_datatype_char),
            "lang" => (&mut language, is_language_char),
            _ => {
                return Err(format!(
                    "Unsupported argument '{key}' for placeholder function '{function}'"
                ))
            }
        };
        if target.is_some() {
            return Err(format!("Duplicate argument '{key}'"));
        }
        if !value.chars().all(is_valid) {
            return Err(format!("Invalid value '{value}' for argument '{key}'"));
        }
        *target = Some(value.to_owned());
    }

    let slot = slot.ok_or_else(|| "Missing slot argument 'v'".to_owned())?;
    Ok(PlaceholderCall {
        function,
        slot,
        datatype,
        language,
    })
}

fn is_slot_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_datatype_char(c: char) -> bool {
    is_slot_char(c) || c == ':'
}

fn is_language_char(c: char) -> bool {
    is_slot_char(c) || c == '-'
}

/// Bytes that may precede the placeholder prefix within a longer prefixed name.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':') || !b.is_ascii()
}

fn find_short_string_end(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn find_long_string_end(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i..].starts_with(&[quote, quote, quote]) {
            return Some(i + 3);
        } else {
            i += 1;
        }
    }
    None
}
