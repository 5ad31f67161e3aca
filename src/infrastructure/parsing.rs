//! HTML parsing infrastructure for search result pages
//!
//! A parsing rule recognizes one kind of result block and turns it into a
//! lazily evaluated record. Rules are tried by [`RuleDispatcher`] in
//! registration order.

pub mod config;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod map_rule;

// Re-export public types
pub use config::{MapSelectors, ParsingConfig};
pub use dispatcher::RuleDispatcher;
pub use document::SerpDocument;
pub use error::{ParsingError, ParsingResult};
pub use map_rule::MapRule;

use scraper::{ElementRef, Selector};
use tracing::warn;

use crate::domain::ResultSink;

/// Outcome of asking a rule whether it applies to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleMatch {
    Matched,
    /// The node belongs to the rule but yields nothing on its own; the
    /// dispatcher stops trying other rules for it.
    Partial,
    NoMatch,
}

impl RuleMatch {
    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

/// Two-phase extraction contract shared by every result block type
pub trait ParsingRule {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Pure predicate: must not have side effects
    fn match_node(&self, document: &SerpDocument, node: ElementRef<'_>) -> RuleMatch;

    /// Append exactly one record for `node` to `sink`.
    ///
    /// Only valid after [`ParsingRule::match_node`] returned
    /// [`RuleMatch::Matched`] for the same document and node.
    fn extract<'a>(&self, document: &'a SerpDocument, node: ElementRef<'a>, sink: &mut dyn ResultSink<'a>);
}

/// Compile one selector of a registry, naming the registry field on failure
pub fn compile_selector(field: &str, selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        warn!("Failed to compile selector '{}' for {}: {}", selector, field, e);
        ParsingError::invalid_selector(field, selector, &e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_selector() {
        assert!(compile_selector("title", "._rl").is_ok());

        let err = compile_selector("stars", "span[").unwrap_err();
        assert!(matches!(
            err,
            ParsingError::InvalidSelector { ref field, ref selector, .. } if field == "stars" && selector == "span["
        ));
    }

    #[test]
    fn test_rule_match() {
        assert!(RuleMatch::Matched.is_matched());
        assert!(!RuleMatch::Partial.is_matched());
        assert!(!RuleMatch::NoMatch.is_matched());
    }
}
