use crate::error::{FieldError, RecordError};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// The value of a record field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Single(String),
    /// Each value produces its own set of triples.
    Sequence(Vec<String>),
}

impl FieldValue {
    /// The values in order. A single value is a sequence of length one.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Sequence(values) => values,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl<T: Into<String>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

/// Something that can be rendered into a template.
///
/// Implementations look up fields by the slot names used in the template. The identity anchors
/// the blank nodes created for the record and must differ between records.
pub trait FieldSource {
    /// A token that identifies this record.
    fn id(&self) -> &str;

    /// Returns the value of the field `name`.
    fn get_field(&self, name: &str) -> Result<FieldValue, FieldError>;
}

/// A [FieldSource] backed by a map.
///
/// Every record receives a fresh random identity on creation, cloning keeps it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    id: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Creates a record with an explicit identity.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Converts a JSON object into a record.
    ///
    /// Strings, numbers and booleans become single values, arrays of those become sequences and
    /// `null` fields are left out.
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let Value::Object(object) = value else {
            return Err(RecordError::NotAnObject(json_type_name(value)));
        };

        let mut record = Self::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let values = items
                        .iter()
                        .map(|item| {
                            json_scalar(item).ok_or_else(|| RecordError::UnsupportedValue {
                                field: name.clone(),
                                reason: "arrays may only contain strings, numbers and booleans",
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    record.insert(name.as_str(), FieldValue::Sequence(values));
                }
                value => {
                    let value =
                        json_scalar(value).ok_or_else(|| RecordError::UnsupportedValue {
                            field: name.clone(),
                            reason: "nested objects are not supported",
                        })?;
                    record.insert(name.as_str(), FieldValue::Single(value));
                }
            }
        }
        Ok(record)
    }

    /// Parses records from JSON text holding one object, an array of objects, or one object per
    /// line.
    pub fn parse_json(text: &str) -> Result<Vec<Self>, RecordError> {
        let mut records = Vec::new();
        for value in serde_json::Deserializer::from_str(text).into_iter::<Value>() {
            match value? {
                Value::Array(values) => {
                    for value in &values {
                        records.push(Self::from_json(value)?);
                    }
                }
                value => records.push(Self::from_json(&value)?),
            }
        }
        Ok(records)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSource for Record {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_field(&self, name: &str) -> Result<FieldValue, FieldError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| FieldError::FieldNotFound(name.to_owned()))
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
