//! Result sinks that collect records emitted by parsing rules

use serde_json::{Value, json};

use super::serp_result::{ResultType, SerpResult};

/// Append-only destination for extracted results.
/// Rules only ever write to a sink, they never read it back.
pub trait ResultSink<'a> {
    fn add_item(&mut self, item: SerpResult<'a>);
}

impl<'a> ResultSink<'a> for Vec<SerpResult<'a>> {
    fn add_item(&mut self, item: SerpResult<'a>) {
        self.push(item);
    }
}

/// A result together with its position on the page
#[derive(Debug)]
pub struct IndexedResult<'a> {
    position: usize,
    result: SerpResult<'a>,
}

impl<'a> IndexedResult<'a> {
    pub const fn position(&self) -> usize {
        self.position
    }

    pub const fn result(&self) -> &SerpResult<'a> {
        &self.result
    }

    pub fn into_result(self) -> SerpResult<'a> {
        self.result
    }
}

/// Ordered result collection assigning 1-based positions on insert
#[derive(Debug)]
pub struct IndexedResultSet<'a> {
    start_index: usize,
    items: Vec<IndexedResult<'a>>,
}

impl Default for IndexedResultSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IndexedResultSet<'a> {
    pub const fn new() -> Self {
        Self::with_start_index(1)
    }

    /// Start numbering at `start_index`, e.g. 11 for the second page of ten
    pub const fn with_start_index(start_index: usize) -> Self {
        Self {
            start_index,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[IndexedResult<'a>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &SerpResult<'a>> + '_ {
        self.items.iter().map(IndexedResult::result)
    }

    pub fn items_of_type(&self, result_type: ResultType) -> impl Iterator<Item = &IndexedResult<'a>> + '_ {
        self.items.iter().filter(move |item| item.result.is_type(result_type))
    }

    pub fn has_type(&self, result_type: ResultType) -> bool {
        self.items_of_type(result_type).next().is_some()
    }

    pub fn into_results(self) -> Vec<SerpResult<'a>> {
        self.items.into_iter().map(IndexedResult::into_result).collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.items
                .iter()
                .map(|item| {
                    json!({
                        "position": item.position,
                        "type": item.result.result_type(),
                        "data": item.result.data().to_json(),
                    })
                })
                .collect(),
        )
    }
}

impl<'a> ResultSink<'a> for IndexedResultSet<'a> {
    fn add_item(&mut self, item: SerpResult<'a>) {
        let position = self.start_index + self.items.len();
        self.items.push(IndexedResult { position, result: item });
    }
}
