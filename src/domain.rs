//! Domain module - result records produced by parsing rules
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod lazy_record;
pub mod result_set;
pub mod serp_result;

// Re-export commonly used items for convenience
pub use lazy_record::{FieldProducer, FieldValue, LazyRecord};
pub use result_set::{IndexedResult, IndexedResultSet, ResultSink};
pub use serp_result::{ResultType, SerpResult};
