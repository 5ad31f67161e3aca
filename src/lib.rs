//! serp-rules - rule-based extraction for search result pages
//!
//! A [`ParsingRule`] decides whether it applies to a node of a parsed page and,
//! if so, emits a [`SerpResult`] whose fields are evaluated lazily from the
//! node's subtree. Only the fields a caller reads are ever queried.
//!
//! ```no_run
//! use serp_rules::{IndexedResultSet, ParsingConfig, RuleDispatcher, SerpDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = std::fs::read_to_string("page.html")?;
//! let document = SerpDocument::parse(&html, "https://www.google.com/search?q=pizza")?;
//! let dispatcher = RuleDispatcher::with_default_rules(&ParsingConfig::default())?;
//!
//! let mut results = IndexedResultSet::new();
//! dispatcher.dispatch(&document, &mut results);
//! for result in results.iter() {
//!     for place in result.results("localPack").unwrap_or_default() {
//!         println!("{:?}", place.text("title"));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod domain;
pub mod infrastructure;

// Re-export the main entry points for easier access
pub use domain::{FieldValue, IndexedResultSet, LazyRecord, ResultSink, ResultType, SerpResult};
pub use infrastructure::{
    AppConfig, MapRule, MapSelectors, ParsingConfig, ParsingError, ParsingResult, ParsingRule, RuleDispatcher,
    RuleMatch, SerpDocument,
};
