//! Parsed search result page
//!
//! Wraps the `scraper` tree together with the URL the page was fetched from,
//! which anchors relative links.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{ParsingError, ParsingResult};

/// Read-only document handed to parsing rules
#[derive(Debug, Clone)]
pub struct SerpDocument {
    html: Html,
    base_url: Url,
}

impl SerpDocument {
    /// Parse raw HTML; `base_url` must be absolute
    pub fn parse(html: &str, base_url: &str) -> ParsingResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ParsingError::invalid_base_url(base_url, &e.to_string()))?;
        Ok(Self::from_html(Html::parse_document(html), base_url))
    }

    pub const fn from_html(html: Html, base_url: Url) -> Self {
        Self { html, base_url }
    }

    pub const fn html(&self) -> &Html {
        &self.html
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    /// `scope` itself is never part of the result.
    pub fn query<'a>(&'a self, selector: &Selector, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope.select(selector).collect()
    }

    /// The `index`-th descendant match, counting from zero
    pub fn query_nth<'a>(
        &'a self,
        selector: &Selector,
        scope: ElementRef<'a>,
        index: usize,
    ) -> Option<ElementRef<'a>> {
        scope.select(selector).nth(index)
    }

    pub fn query_first<'a>(&'a self, selector: &Selector, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.query_nth(selector, scope, 0)
    }

    pub fn count(&self, selector: &Selector, scope: ElementRef<'_>) -> usize {
        scope.select(selector).count()
    }

    /// Resolve a possibly relative link against the page URL
    pub fn resolve_url(&self, href: &str) -> ParsingResult<String> {
        self.base_url
            .join(href)
            .map(String::from)
            .map_err(|e| ParsingError::url_resolution_failed(href, &e.to_string(), self.base_url.as_str()))
    }
}

/// Concatenated text of every descendant text node, untrimmed
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of the `index`-th child node when that child is a text node.
/// Element, comment and missing children all yield `None`.
pub fn child_text(element: ElementRef<'_>, index: usize) -> Option<&str> {
    element
        .children()
        .nth(index)
        .and_then(|child| child.value().as_text())
        .map(|text| &**text)
}

/// Whether the element has children and the first one is not a text node
pub fn starts_with_non_text(element: ElementRef<'_>) -> bool {
    element
        .children()
        .next()
        .is_some_and(|child| !child.value().is_text())
}
