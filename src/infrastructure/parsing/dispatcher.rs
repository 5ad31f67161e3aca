//! Rule dispatcher
//!
//! Walks candidate nodes of a page and hands each one to the registered rules
//! in registration order. The first rule that matches a node wins.

use scraper::{ElementRef, Selector};
use tracing::{debug, info};

use super::{MapRule, ParsingConfig, ParsingResult, ParsingRule, RuleMatch, SerpDocument, compile_selector};
use crate::domain::ResultSink;

pub struct RuleDispatcher {
    rules: Vec<Box<dyn ParsingRule>>,
    candidates: Selector,
}

impl RuleDispatcher {
    /// Dispatcher without any rule registered
    pub fn new(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            rules: Vec::new(),
            candidates: compile_selector("result_candidates", &config.result_candidates)?,
        })
    }

    /// Dispatcher with every built-in rule, in priority order
    pub fn with_default_rules(config: &ParsingConfig) -> ParsingResult<Self> {
        let mut dispatcher = Self::new(config)?;
        dispatcher.register(MapRule::with_config(&config.map_selectors)?);
        Ok(dispatcher)
    }

    /// Append a rule; it is tried after every rule registered before it
    pub fn register<R>(&mut self, rule: R) -> &mut Self
    where
        R: ParsingRule + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Try every rule on `node`. Returns the name of the rule that extracted it.
    pub fn dispatch_node<'a>(
        &self,
        document: &'a SerpDocument,
        node: ElementRef<'a>,
        sink: &mut dyn ResultSink<'a>,
    ) -> Option<&'static str> {
        for rule in &self.rules {
            match rule.match_node(document, node) {
                RuleMatch::Matched => {
                    debug!("Rule '{}' matched candidate node", rule.name());
                    rule.extract(document, node, sink);
                    return Some(rule.name());
                }
                RuleMatch::Partial => {
                    debug!("Rule '{}' claimed candidate node without a result", rule.name());
                    return None;
                }
                RuleMatch::NoMatch => {}
            }
        }
        None
    }

    /// Dispatch every candidate node of the page in document order.
    /// Returns the number of extracted results.
    pub fn dispatch<'a>(&self, document: &'a SerpDocument, sink: &mut dyn ResultSink<'a>) -> usize {
        let mut candidates = 0;
        let mut extracted = 0;

        for node in document.html().select(&self.candidates) {
            candidates += 1;
            if self.dispatch_node(document, node, sink).is_some() {
                extracted += 1;
            }
        }

        info!(
            "Dispatched {} candidate nodes against {} rules, extracted {} results",
            candidates,
            self.rules.len(),
            extracted
        );
        extracted
    }
}

impl std::fmt::Debug for RuleDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDispatcher")
            .field("rules", &self.rule_names())
            .field("candidates", &self.candidates)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, LazyRecord, ResultType, SerpResult};

    /// Claims every node and emits an empty map record
    struct CatchAll;

    impl ParsingRule for CatchAll {
        fn name(&self) -> &'static str {
            "catch_all"
        }

        fn match_node(&self, _document: &SerpDocument, _node: ElementRef<'_>) -> RuleMatch {
            RuleMatch::Matched
        }

        fn extract<'a>(&self, _document: &'a SerpDocument, _node: ElementRef<'a>, sink: &mut dyn ResultSink<'a>) {
            sink.add_item(SerpResult::new(
                ResultType::Map,
                LazyRecord::new().with_field("source", || FieldValue::Text("catch_all".to_string())),
            ));
        }
    }

    struct Blocker;

    impl ParsingRule for Blocker {
        fn name(&self) -> &'static str {
            "blocker"
        }

        fn match_node(&self, _document: &SerpDocument, _node: ElementRef<'_>) -> RuleMatch {
            RuleMatch::Partial
        }

        fn extract<'a>(&self, _document: &'a SerpDocument, _node: ElementRef<'a>, _sink: &mut dyn ResultSink<'a>) {}
    }

    const PAGE: &str = r#"<html><body><div id="rso">
        <div class="g"><a href="/organic">Organic</a></div>
        <div class="lpack"><div class="_M4k"></div><div class="_gt"></div></div>
    </div></body></html>"#;

    fn document() -> SerpDocument {
        SerpDocument::parse(PAGE, "https://www.google.com/search?q=pizza").unwrap()
    }

    #[test]
    fn test_default_rules() {
        let dispatcher = RuleDispatcher::with_default_rules(&ParsingConfig::default()).unwrap();
        assert_eq!(dispatcher.rule_names(), ["map"]);
    }

    #[test]
    fn test_invalid_candidate_selector() {
        let config = ParsingConfig {
            result_candidates: "#rso >".to_string(),
            ..ParsingConfig::default()
        };
        assert!(RuleDispatcher::new(&config).is_err());
    }

    #[test]
    fn test_dispatch_skips_unmatched_candidates() {
        let doc = document();
        let dispatcher = RuleDispatcher::with_default_rules(&ParsingConfig::default()).unwrap();
        let mut sink: Vec<SerpResult<'_>> = Vec::new();

        assert_eq!(dispatcher.dispatch(&doc, &mut sink), 1);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].is_type(ResultType::Map));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let doc = document();
        let mut dispatcher = RuleDispatcher::with_default_rules(&ParsingConfig::default()).unwrap();
        dispatcher.register(CatchAll);
        let mut sink: Vec<SerpResult<'_>> = Vec::new();

        assert_eq!(dispatcher.dispatch(&doc, &mut sink), 2);
        // Organic block falls through to the catch-all, the map block stays with the map rule
        assert_eq!(sink[0].text("source").as_deref(), Some("catch_all"));
        assert!(sink[1].data().has_field("localPack"));
    }

    #[test]
    fn test_partial_stops_rule_search() {
        let doc = document();
        let mut dispatcher = RuleDispatcher::new(&ParsingConfig::default()).unwrap();
        dispatcher.register(Blocker).register(CatchAll);
        let mut sink: Vec<SerpResult<'_>> = Vec::new();

        assert_eq!(dispatcher.dispatch(&doc, &mut sink), 0);
        assert!(sink.is_empty());
    }
}
