//! Local results block with a map ("local pack")
//!
//! The block holds a map link and a ranked list of places. Every field of the
//! emitted records is a producer that queries the block when read.
//!
//! The source site renders the place detail line as "rating count · phone".
//! Depending on whether an icon element precedes the text, the same line shows
//! up with different child node shapes, so `review` and `phone` look at the
//! kinds of child nodes rather than splitting the flattened text.

use std::sync::Arc;

use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use super::document::{child_text, starts_with_non_text, text_content};
use super::{MapSelectors, ParsingResult, ParsingRule, RuleMatch, SerpDocument, compile_selector};
use crate::domain::{FieldValue, LazyRecord, ResultSink, ResultType, SerpResult};

/// Separator joining short fragments of the detail line
const MIDDLE_DOT: char = '·';

/// Compiled form of [`MapSelectors`]
#[derive(Debug)]
struct CompiledMapSelectors {
    map_block: Selector,
    place_entry: Selector,
    map_link: Selector,
    title: Selector,
    anchor: Selector,
    street: Selector,
    street_fallback: Selector,
    stars: Selector,
    review_detail: Selector,
    phone_detail: Selector,
}

impl CompiledMapSelectors {
    fn compile(selectors: &MapSelectors) -> ParsingResult<Self> {
        Ok(Self {
            map_block: compile_selector("map_block", &selectors.map_block)?,
            place_entry: compile_selector("place_entry", &selectors.place_entry)?,
            map_link: compile_selector("map_link", &selectors.map_link)?,
            title: compile_selector("title", &selectors.title)?,
            anchor: compile_selector("anchor", &selectors.anchor)?,
            street: compile_selector("street", &selectors.street)?,
            street_fallback: compile_selector("street_fallback", &selectors.street_fallback)?,
            stars: compile_selector("stars", &selectors.stars)?,
            review_detail: compile_selector("review_detail", &selectors.review_detail)?,
            phone_detail: compile_selector("phone_detail", &selectors.phone_detail)?,
        })
    }
}

/// Rule for the map / local pack block
#[derive(Debug, Clone)]
pub struct MapRule {
    selectors: Arc<CompiledMapSelectors>,
}

impl MapRule {
    /// Create a rule with the default selector registry
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&MapSelectors::default())
    }

    /// Create a rule with a custom selector registry.
    /// Fails on the first selector that does not compile.
    pub fn with_config(selectors: &MapSelectors) -> ParsingResult<Self> {
        Ok(Self {
            selectors: Arc::new(CompiledMapSelectors::compile(selectors)?),
        })
    }

    fn map_record<'a>(&self, document: &'a SerpDocument, node: ElementRef<'a>) -> LazyRecord<'a> {
        let pack_selectors = Arc::clone(&self.selectors);
        let url_selectors = Arc::clone(&self.selectors);

        LazyRecord::new()
            .with_field("localPack", move || local_pack(&pack_selectors, document, node))
            .with_field("mapUrl", move || map_url(&url_selectors, document, node))
    }
}

impl ParsingRule for MapRule {
    fn name(&self) -> &'static str {
        "map"
    }

    fn match_node(&self, document: &SerpDocument, node: ElementRef<'_>) -> RuleMatch {
        if document.count(&self.selectors.map_block, node) == 1 {
            RuleMatch::Matched
        } else {
            RuleMatch::NoMatch
        }
    }

    fn extract<'a>(&self, document: &'a SerpDocument, node: ElementRef<'a>, sink: &mut dyn ResultSink<'a>) {
        debug_assert!(
            self.match_node(document, node).is_matched(),
            "extract called on a node the map rule does not match"
        );
        debug!("Extracting map block");
        sink.add_item(SerpResult::new(ResultType::Map, self.map_record(document, node)));
    }
}

fn local_pack<'a>(
    selectors: &Arc<CompiledMapSelectors>,
    document: &'a SerpDocument,
    node: ElementRef<'a>,
) -> FieldValue<'a> {
    let places: Vec<SerpResult<'a>> = document
        .query(&selectors.place_entry, node)
        .into_iter()
        .map(|place| SerpResult::new(ResultType::MapPlace, place_record(selectors, document, place)))
        .collect();

    debug!("Found {} places in local pack", places.len());
    FieldValue::Results(places)
}

fn map_url<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, node: ElementRef<'a>) -> FieldValue<'a> {
    let Some(anchor) = document.query_first(&selectors.map_link, node) else {
        return FieldValue::Absent;
    };
    // A link without href resolves to the page itself
    let href = anchor.value().attr("href").unwrap_or_default();

    match document.resolve_url(href) {
        Ok(url) => FieldValue::Text(url),
        Err(e) => {
            warn!("Ignoring map link: {}", e);
            FieldValue::Absent
        }
    }
}

fn place_record<'a>(
    selectors: &Arc<CompiledMapSelectors>,
    document: &'a SerpDocument,
    place: ElementRef<'a>,
) -> LazyRecord<'a> {
    let field = move |extract: fn(&CompiledMapSelectors, &'a SerpDocument, ElementRef<'a>) -> FieldValue<'a>| {
        let selectors = Arc::clone(selectors);
        move || extract(&selectors, document, place)
    };

    LazyRecord::new()
        .with_field("title", field(place_title))
        .with_field("url", field(place_url))
        .with_field("street", field(place_street))
        .with_field("stars", field(place_stars))
        .with_field("review", field(place_review))
        .with_field("phone", field(place_phone))
}

fn first_text<'a>(document: &'a SerpDocument, selector: &Selector, scope: ElementRef<'a>) -> Option<String> {
    document.query_first(selector, scope).map(text_content)
}

fn place_title<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, place: ElementRef<'a>) -> FieldValue<'a> {
    first_text(document, &selectors.title, place).into()
}

/// The first anchor wraps the title; the second one points at the website.
/// A second anchor without `href` yields an empty string.
fn place_url<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, place: ElementRef<'a>) -> FieldValue<'a> {
    document
        .query_nth(&selectors.anchor, place, 1)
        .map(|anchor| anchor.value().attr("href").unwrap_or_default().to_string())
        .into()
}

fn place_street<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, place: ElementRef<'a>) -> FieldValue<'a> {
    first_text(document, &selectors.street, place)
        .or_else(|| first_text(document, &selectors.street_fallback, place))
        .into()
}

fn place_stars<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, place: ElementRef<'a>) -> FieldValue<'a> {
    first_text(document, &selectors.stars, place).into()
}

fn place_review<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, place: ElementRef<'a>) -> FieldValue<'a> {
    let Some(detail) = document.query_first(&selectors.review_detail, place) else {
        return FieldValue::Absent;
    };
    // A leading icon means the line carries something other than the review count
    if starts_with_non_text(detail) {
        return FieldValue::Absent;
    }

    let text = text_content(detail);
    let count = text.split(MIDDLE_DOT).next().unwrap_or_default();
    FieldValue::Text(count.trim().to_string())
}

fn place_phone<'a>(selectors: &CompiledMapSelectors, document: &'a SerpDocument, place: ElementRef<'a>) -> FieldValue<'a> {
    document
        .query_first(&selectors.phone_detail, place)
        .and_then(|detail| child_text(detail, 1))
        .map(|text| text.trim_matches(|c: char| c == ' ' || c == MIDDLE_DOT).to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_URL: &str = "https://www.google.com/search?q=pizza";

    fn block(inner: &str) -> String {
        format!(r#"<html><body><div id="block">{inner}</div></body></html>"#)
    }

    fn place(inner: &str) -> String {
        block(&format!(r#"<div class="_M4k"></div><div class="_gt">{inner}</div>"#))
    }

    fn details(lines: &str) -> String {
        format!(r#"<div class="_iPk"><span class="rllt__details">{lines}</span></div>"#)
    }

    fn node(document: &SerpDocument) -> ElementRef<'_> {
        let selector = Selector::parse("#block").unwrap();
        document.query_first(&selector, document.root()).unwrap()
    }

    fn extract_one(document: &SerpDocument) -> SerpResult<'_> {
        let rule = MapRule::new().unwrap();
        let mut sink: Vec<SerpResult<'_>> = Vec::new();
        rule.extract(document, node(document), &mut sink);
        assert_eq!(sink.len(), 1);
        sink.remove(0)
    }

    fn first_place(document: &SerpDocument) -> SerpResult<'_> {
        let mut places = extract_one(document).results("localPack").unwrap();
        assert!(!places.is_empty());
        places.remove(0)
    }

    #[test]
    fn test_rule_creation() {
        assert!(MapRule::new().is_ok());
    }

    #[test]
    fn test_invalid_selector_rejects_rule() {
        let selectors = MapSelectors {
            phone_detail: "div[".to_string(),
            ..MapSelectors::default()
        };
        assert!(MapRule::with_config(&selectors).is_err());
    }

    #[test]
    fn test_match_requires_exactly_one_marker() {
        let rule = MapRule::new().unwrap();

        let none = SerpDocument::parse(&block("<div class=\"_gt\"></div>"), BASE_URL).unwrap();
        let one = SerpDocument::parse(&block("<div class=\"_M4k\"></div>"), BASE_URL).unwrap();
        let two = SerpDocument::parse(&block("<div class=\"_M4k\"></div><div class=\"_M4k\"></div>"), BASE_URL).unwrap();

        assert_eq!(rule.match_node(&none, node(&none)), RuleMatch::NoMatch);
        assert_eq!(rule.match_node(&one, node(&one)), RuleMatch::Matched);
        assert_eq!(rule.match_node(&two, node(&two)), RuleMatch::NoMatch);
    }

    #[test]
    fn test_marker_class_must_match_exactly() {
        let rule = MapRule::new().unwrap();
        let doc = SerpDocument::parse(&block("<div class=\"_M4k extra\"></div>"), BASE_URL).unwrap();
        assert_eq!(rule.match_node(&doc, node(&doc)), RuleMatch::NoMatch);
    }

    #[test]
    fn test_record_fields_in_order() {
        let doc = SerpDocument::parse(&place(""), BASE_URL).unwrap();
        let result = extract_one(&doc);
        assert_eq!(result.result_type(), ResultType::Map);
        assert_eq!(result.data().field_names().collect::<Vec<_>>(), ["localPack", "mapUrl"]);

        let place = first_place(&doc);
        assert_eq!(place.result_type(), ResultType::MapPlace);
        assert_eq!(
            place.data().field_names().collect::<Vec<_>>(),
            ["title", "url", "street", "stars", "review", "phone"]
        );
    }

    #[test]
    fn test_empty_local_pack_is_an_empty_list() {
        let doc = SerpDocument::parse(&block("<div class=\"_M4k\"></div>"), BASE_URL).unwrap();
        let result = extract_one(&doc);

        let pack = result.get("localPack").unwrap();
        assert_eq!(pack.as_results().map(<[_]>::len), Some(0));
        assert!(result.get("mapUrl").unwrap().is_absent());
    }

    #[test]
    fn test_map_url_is_first_anchor_resolved() {
        let doc = SerpDocument::parse(
            &block(
                r#"<div class="_M4k"></div><div class="_wNi"><span><a href="/maps?q=pizza">Map</a></span><a href="/maps/other">Other</a></div>"#,
            ),
            BASE_URL,
        )
        .unwrap();

        assert_eq!(
            extract_one(&doc).text("mapUrl").as_deref(),
            Some("https://www.google.com/maps?q=pizza")
        );
    }

    #[test]
    fn test_map_url_without_href_is_base_url() {
        let doc = SerpDocument::parse(&block(r#"<div class="_M4k"></div><div class="_wNi"><a>Map</a></div>"#), BASE_URL)
            .unwrap();
        assert_eq!(extract_one(&doc).text("mapUrl").as_deref(), Some(BASE_URL));
    }

    #[test]
    fn test_map_url_without_link_container_is_absent() {
        let doc = SerpDocument::parse(&block(r#"<div class="_M4k"></div><a href="/maps">Map</a>"#), BASE_URL).unwrap();
        assert!(extract_one(&doc).get("mapUrl").unwrap().is_absent());
    }

    #[test]
    fn test_title_keeps_raw_text() {
        let doc = SerpDocument::parse(&place(r#"<div class="_rl"> Luigi's <b>Pizza</b></div>"#), BASE_URL).unwrap();
        assert_eq!(first_place(&doc).text("title").as_deref(), Some(" Luigi's Pizza"));
    }

    #[test]
    fn test_url_is_second_anchor_unresolved() {
        let doc = SerpDocument::parse(
            &place(r#"<a href="/place/1">Luigi's</a><a href="/url?q=luigis">Website</a><a href="/third">x</a>"#),
            BASE_URL,
        )
        .unwrap();
        assert_eq!(first_place(&doc).text("url").as_deref(), Some("/url?q=luigis"));
    }

    #[test]
    fn test_url_second_anchor_without_href_is_empty() {
        let doc = SerpDocument::parse(&place(r#"<a href="/place/1">Luigi's</a><a>Website</a>"#), BASE_URL).unwrap();
        assert_eq!(first_place(&doc).text("url").as_deref(), Some(""));
    }

    #[test]
    fn test_url_with_single_anchor_is_absent() {
        let doc = SerpDocument::parse(&place(r#"<a href="/place/1">Luigi's</a>"#), BASE_URL).unwrap();
        assert!(first_place(&doc).get("url").unwrap().is_absent());
    }

    #[test]
    fn test_street_fallback() {
        let fallback =
            r#"<div class="_iPk _Ml"><span class="rllt__details"><div>a</div><div>b</div><div><span>5 Elm St</span></div></span></div>"#;
        let doc = SerpDocument::parse(&place(fallback), BASE_URL).unwrap();
        assert_eq!(first_place(&doc).text("street").as_deref(), Some("5 Elm St"));
    }

    #[test]
    fn test_review_and_phone_on_text_lines() {
        let lines = details("<div>120 reviews · 4.5 ★</div><div>Pizza</div><div><span>12 Main St</span> · +1 555-1234</div>");
        let doc = SerpDocument::parse(&place(&lines), BASE_URL).unwrap();
        let place = first_place(&doc);

        assert_eq!(place.text("review").as_deref(), Some("120 reviews"));
        assert_eq!(place.text("phone").as_deref(), Some("+1 555-1234"));
        assert_eq!(place.text("street").as_deref(), Some("12 Main St"));
    }

    #[test]
    fn test_review_with_leading_element_is_absent() {
        let lines = details(r#"<div><g-img></g-img>120 reviews · 4.5</div>"#);
        let doc = SerpDocument::parse(&place(&lines), BASE_URL).unwrap();
        assert!(first_place(&doc).get("review").unwrap().is_absent());
    }

    #[test]
    fn test_review_without_separator_keeps_whole_text() {
        let lines = details("<div>  No reviews  </div>");
        let doc = SerpDocument::parse(&place(&lines), BASE_URL).unwrap();
        assert_eq!(first_place(&doc).text("review").as_deref(), Some("No reviews"));
    }

    #[test]
    fn test_phone_with_single_child_is_absent() {
        let lines = details("<div>a</div><div>b</div><div>Open now</div>");
        let doc = SerpDocument::parse(&place(&lines), BASE_URL).unwrap();
        assert!(first_place(&doc).get("phone").unwrap().is_absent());
    }

    #[test]
    fn test_stars_keeps_raw_text() {
        let doc = SerpDocument::parse(&place(r#"<span class="_PXi">4,5</span>"#), BASE_URL).unwrap();
        assert_eq!(first_place(&doc).text("stars").as_deref(), Some("4,5"));
    }

    #[test]
    fn test_producers_are_idempotent() {
        let lines = details("<div>9 reviews · x</div><div>b</div><div><span>1 Road</span> · 0123</div>");
        let doc = SerpDocument::parse(&place(&format!(r#"<div class="_rl">Cafe</div>{lines}"#)), BASE_URL).unwrap();
        let result = extract_one(&doc);

        assert_eq!(result.to_json(), result.to_json());
        assert_eq!(result.text("mapUrl"), result.text("mapUrl"));
    }
}
