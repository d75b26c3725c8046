//! Product-link diggers
//!
//! A digger reads one listing page and returns the detail-page URL of every
//! product on it, in document order. Anchors without an `href`, or with an
//! empty one, are skipped.

use crate::document::{href, Document};
use crate::url::resolve;

/// Extracts product detail URLs from a listing page
pub trait Digger: Send + Sync {
    /// Returns the product URLs found on the page
    ///
    /// An empty vector means the page lists no products.
    fn product_list(&self, url: &str, document: &Document) -> Vec<String>;
}

/// Collects the non-empty hrefs of every anchor matching `css`
fn anchor_hrefs(document: &Document, css: &str) -> Vec<String> {
    document
        .select(css)
        .into_iter()
        .filter_map(href)
        .map(str::to_string)
        .collect()
}

pub struct DangdangDigger;

impl Digger for DangdangDigger {
    fn product_list(&self, _url: &str, document: &Document) -> Vec<String> {
        anchor_hrefs(document, ".mode_goods div.name a")
    }
}

pub struct JingdongDigger;

impl Digger for JingdongDigger {
    fn product_list(&self, _url: &str, document: &Document) -> Vec<String> {
        anchor_hrefs(document, "#plist ul.list-h div.p-img a")
    }
}

pub struct NeweggDigger;

impl Digger for NeweggDigger {
    fn product_list(&self, _url: &str, document: &Document) -> Vec<String> {
        anchor_hrefs(document, "#itemGrid1 div.itemCell dt a")
    }
}

/// Suning links to products with site-relative paths
pub struct SuningDigger;

const SUNING_ORIGIN: &str = "http://www.suning.com";

impl Digger for SuningDigger {
    fn product_list(&self, _url: &str, document: &Document) -> Vec<String> {
        anchor_hrefs(document, "#product_container li .pro_img a")
            .into_iter()
            .map(|href| resolve(SUNING_ORIGIN, &href))
            .collect()
    }
}

pub struct TmallDigger;

impl Digger for TmallDigger {
    fn product_list(&self, _url: &str, document: &Document) -> Vec<String> {
        anchor_hrefs(document, "div.product a")
    }
}

pub struct GomeDigger;

impl Digger for GomeDigger {
    fn product_list(&self, _url: &str, document: &Document) -> Vec<String> {
        anchor_hrefs(document, "#plist .p-img a")
    }
}
