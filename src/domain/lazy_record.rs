//! Lazily evaluated result records
//!
//! A record maps field names to producers. A producer runs its tree queries
//! only when the field is read, and nothing is cached: reading the same field
//! twice runs the producer twice against the same unchanged document.

use std::fmt;

use serde_json::{Map, Value};

use super::serp_result::SerpResult;

/// Deferred computation of a single field value
pub type FieldProducer<'a> = Box<dyn Fn() -> FieldValue<'a> + 'a>;

/// Value returned by a field producer
pub enum FieldValue<'a> {
    /// The queried structure was not there. Expected, not an error.
    Absent,
    Text(String),
    Results(Vec<SerpResult<'a>>),
}

impl<'a> FieldValue<'a> {
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_results(&self) -> Option<&[SerpResult<'a>]> {
        match self {
            Self::Results(results) => Some(results),
            _ => None,
        }
    }

    pub fn into_results(self) -> Option<Vec<SerpResult<'a>>> {
        match self {
            Self::Results(results) => Some(results),
            _ => None,
        }
    }

    /// Materialize the value, evaluating nested records recursively
    pub fn to_json(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
            Self::Results(results) => Value::Array(results.iter().map(SerpResult::to_json).collect()),
        }
    }
}

impl From<Option<String>> for FieldValue<'_> {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Text)
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Results(results) => f.debug_tuple("Results").field(results).finish(),
        }
    }
}

/// Ordered mapping from field name to field producer
#[derive(Default)]
pub struct LazyRecord<'a> {
    fields: Vec<(&'static str, FieldProducer<'a>)>,
}

impl<'a> LazyRecord<'a> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field. Field order is kept for materialization.
    pub fn with_field<F>(mut self, name: &'static str, producer: F) -> Self
    where
        F: Fn() -> FieldValue<'a> + 'a,
    {
        debug_assert!(!self.has_field(name), "duplicate field '{name}'");
        self.fields.push((name, Box::new(producer)));
        self
    }

    /// Run the producer for `name`. `None` means the record has no such field,
    /// which is different from a field evaluating to [`FieldValue::Absent`].
    pub fn get(&self, name: &str) -> Option<FieldValue<'a>> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, producer)| producer())
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(FieldValue::into_text)
    }

    pub fn results(&self, name: &str) -> Option<Vec<SerpResult<'a>>> {
        self.get(name).and_then(FieldValue::into_results)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| *field == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Evaluate every field once into a JSON object
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, producer)| ((*name).to_string(), producer().to_json()))
            .collect();
        Value::Object(object)
    }
}

impl fmt::Debug for LazyRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRecord")
            .field("fields", &self.fields.iter().map(|(name, _)| *name).collect::<Vec<_>>())
            .finish()
    }
}
