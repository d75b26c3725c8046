//! Parsed HTML document abstraction
//!
//! Every extractor in this crate reads HTML through [`Document`], which wraps
//! a `scraper` tree and exposes "select all" and "select first" queries. A
//! selector that fails to parse is treated like a selector that matches
//! nothing, so extractors can degrade to their defaults instead of failing.

use scraper::{ElementRef, Html, Selector};

/// A read-only parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document
    ///
    /// # Example
    ///
    /// ```
    /// use mall_spider::Document;
    ///
    /// let doc = Document::parse(r#"<html><body><h1 id="t"> Hi </h1></body></html>"#);
    /// assert_eq!(doc.select_one("#t").map(mall_spider::document::stripped_text), Some("Hi".to_string()));
    /// ```
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Returns every element matching `css`, in document order
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// Returns the first element matching `css`
    pub fn select_one(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(css)?;
        self.html.select(&selector).next()
    }
}

/// Returns every descendant of `element` matching `css`, in document order
pub fn select_in<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Some(selector) => element.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Returns the first descendant of `element` matching `css`
pub fn select_first_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(css)?;
    element.select(&selector).next()
}

/// Concatenates the element's text nodes, each trimmed, skipping empty ones
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Concatenates the element's text nodes verbatim
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Returns an attribute value, if present
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Returns a non-empty `href` attribute
pub fn href(element: ElementRef<'_>) -> Option<&str> {
    attr(element, "href").filter(|h| !h.is_empty())
}

/// Returns the element's `class` attribute joined by single spaces
pub fn class_string(element: ElementRef<'_>) -> String {
    attr(element, "class")
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}
