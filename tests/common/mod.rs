//! Shared fixtures for integration tests

#![allow(dead_code)]

use scraper::{ElementRef, Selector};
use serp_rules::SerpDocument;

pub const BASE_URL: &str = "https://www.google.co.in/search?q=restaurants+near+by";

pub const LOCAL_PACK_PAGE: &str = include_str!("../fixtures/local_pack.html");

pub fn local_pack_document() -> SerpDocument {
    SerpDocument::parse(LOCAL_PACK_PAGE, BASE_URL).unwrap()
}

/// Page with a single `#block` candidate wrapping `inner`
pub fn block_document(inner: &str) -> SerpDocument {
    let html = format!(r#"<html><body><div id="rso"><div id="block">{inner}</div></div></body></html>"#);
    SerpDocument::parse(&html, BASE_URL).unwrap()
}

pub fn select_one<'a>(document: &'a SerpDocument, css: &str) -> ElementRef<'a> {
    let selector = Selector::parse(css).unwrap();
    document.query_first(&selector, document.root()).unwrap()
}

pub fn block(document: &SerpDocument) -> ElementRef<'_> {
    select_one(document, "#block")
}

/// One place entry with a detail line built from the three given lines
pub fn place_with_details(container_class: &str, lines: [&str; 3]) -> String {
    format!(
        r#"<div class="_gt"><div class="{container_class}"><span class="rllt__details"><div>{}</div><div>{}</div><div>{}</div></span></div></div>"#,
        lines[0], lines[1], lines[2]
    )
}

pub const MAP_MARKER: &str = r#"<div class="_M4k"></div>"#;
