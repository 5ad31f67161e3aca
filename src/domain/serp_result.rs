//! Typed result wrapper shared by every parsing rule

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::lazy_record::{FieldValue, LazyRecord};

/// Discriminator telling consumers what kind of block a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    /// Local results block with a map
    Map,
    /// One business row inside a [`ResultType::Map`] block
    MapPlace,
}

impl ResultType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Map => "MAP",
            Self::MapPlace => "MAP_PLACE",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lazy record tagged with its result type
pub struct SerpResult<'a> {
    result_type: ResultType,
    data: LazyRecord<'a>,
}

impl<'a> SerpResult<'a> {
    pub const fn new(result_type: ResultType, data: LazyRecord<'a>) -> Self {
        Self { result_type, data }
    }

    pub const fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn is_type(&self, result_type: ResultType) -> bool {
        self.result_type == result_type
    }

    pub const fn data(&self) -> &LazyRecord<'a> {
        &self.data
    }

    pub fn get(&self, name: &str) -> Option<FieldValue<'a>> {
        self.data.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.data.text(name)
    }

    pub fn results(&self, name: &str) -> Option<Vec<SerpResult<'a>>> {
        self.data.results(name)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "type": self.result_type,
            "data": self.data.to_json(),
        })
    }
}

impl fmt::Debug for SerpResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerpResult")
            .field("result_type", &self.result_type)
            .field("data", &self.data)
            .finish()
    }
}
