//! Parsing configuration for HTML extraction
//!
//! Centralized registry of the CSS selectors used by parsing rules. The source
//! site changes its markup regularly; patching a selector here must never
//! require touching extraction logic.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{ParsingError, ParsingResult};
use crate::infrastructure::config::defaults;

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Base URL for resolving relative links
    pub base_url: String,

    /// Selector for the nodes handed to each rule, evaluated from the document root
    pub result_candidates: String,

    /// Local pack (map) selectors
    pub map_selectors: MapSelectors,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            result_candidates: defaults::RESULT_CANDIDATES.to_string(),
            map_selectors: MapSelectors::default(),
        }
    }
}

impl ParsingConfig {
    pub fn validate(&self) -> ParsingResult<()> {
        Url::parse(&self.base_url)
            .map_err(|e| ParsingError::invalid_base_url(&self.base_url, &e.to_string()))?;

        if self.result_candidates.trim().is_empty() {
            return Err(ParsingError::configuration(
                "result_candidates",
                "candidate selector must not be empty",
            ));
        }

        self.map_selectors.validate()
    }
}

/// CSS selectors for the local results block with a map.
///
/// All of them are evaluated against descendants of the block node, or of a
/// place entry for the per-place fields. `scraper` only scopes the rightmost
/// compound selector, so multi-step paths start with `:scope` to keep every
/// step inside that node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSelectors {
    /// Marker that must appear exactly once for the block to be a map block
    pub map_block: String,

    /// One business row
    pub place_entry: String,

    /// Anchor inside the map-link container
    pub map_link: String,

    /// Per-place fields
    pub title: String,
    pub anchor: String,
    pub street: String,
    /// Alternate markup, tried only when `street` finds nothing
    pub street_fallback: String,
    pub stars: String,
    pub review_detail: String,
    pub phone_detail: String,
}

impl Default for MapSelectors {
    fn default() -> Self {
        Self {
            map_block: r#"div[class="_M4k"]"#.to_string(),
            place_entry: r#"div[class="_gt"]"#.to_string(),
            map_link: r#":scope div[class="_wNi"] a"#.to_string(),
            title: "._rl".to_string(),
            anchor: "a".to_string(),
            street: r#":scope div[class="_iPk"] > span[class="rllt__details"] > div:nth-of-type(3) > span"#
                .to_string(),
            street_fallback:
                r#":scope div[class="_iPk _Ml"] > span[class="rllt__details"] > div:nth-of-type(3) > span"#
                    .to_string(),
            stars: r#"span[class="_PXi"]"#.to_string(),
            review_detail: r#":scope div[class="_iPk"] > span[class="rllt__details"] > div:nth-of-type(1)"#
                .to_string(),
            phone_detail: r#":scope div[class="_iPk"] > span[class="rllt__details"] > div:nth-of-type(3)"#
                .to_string(),
        }
    }
}

impl MapSelectors {
    /// Field name / selector pairs in declaration order
    pub fn entries(&self) -> [(&'static str, &str); 10] {
        [
            ("map_block", self.map_block.as_str()),
            ("place_entry", self.place_entry.as_str()),
            ("map_link", self.map_link.as_str()),
            ("title", self.title.as_str()),
            ("anchor", self.anchor.as_str()),
            ("street", self.street.as_str()),
            ("street_fallback", self.street_fallback.as_str()),
            ("stars", self.stars.as_str()),
            ("review_detail", self.review_detail.as_str()),
            ("phone_detail", self.phone_detail.as_str()),
        ]
    }

    pub fn validate(&self) -> ParsingResult<()> {
        for (field, selector) in self.entries() {
            if selector.trim().is_empty() {
                return Err(ParsingError::configuration(field, "selector must not be empty"));
            }
        }
        Ok(())
    }
}
