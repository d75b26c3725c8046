//! Product detail parsers
//!
//! A parser reads one product detail page and extracts each attribute on its
//! own. Every extractor tolerates missing markup: a field the page does not
//! carry comes back as `None` (or an empty list) instead of an error, so one
//! oddly shaped page never stops a scrape.
//!
//! Fields no site exposes reliably (`end_product`, `merchant`, `brand`,
//! `brand_type`, and several per-site ones) are placeholders that always
//! return `None`.

mod dangdang;
mod gome;
mod jingdong;
mod newegg;
mod suning;
mod tmall;

pub use dangdang::DangdangParser;
pub use gome::GomeParser;
pub use jingdong::JingdongParser;
pub use newegg::NeweggParser;
pub use suning::SuningParser;
pub use tmall::TmallParser;

use crate::document::{attr, class_string, Document};
use crate::site::Site;
use crate::url::first_digit_run;
use chrono::{Local, NaiveDate, NaiveDateTime};
use scraper::ElementRef;

/// A customer review attached to a product
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub title: String,
    pub content: String,
    pub publish_at: NaiveDateTime,
    pub star: u32,
}

/// A breadcrumb entry naming a category the product belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: String,
}

/// Everything extracted from one product detail page
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAttributes {
    pub kind: Site,
    pub title: Option<String>,
    pub price: Option<i64>,
    pub price_url: Option<String>,
    pub stock: Option<u32>,
    pub image_url: Option<String>,
    pub desc: Option<String>,
    pub score: Option<u32>,
    pub product_code: Option<String>,
    pub standard: Option<String>,
    pub comments: Vec<Comment>,
    pub end_product: Option<String>,
    pub merchant: Option<String>,
    pub brand: Option<String>,
    pub brand_type: Option<String>,
    pub belongs_to_categories: Vec<Category>,
    pub product_url_id: i64,
}

/// Extracts product attributes from a detail page
///
/// Every method is a pure function of the parsed page.
pub trait Parser: Send + Sync {
    /// The site this parser understands; stored as the product's `kind`
    fn site(&self) -> Site;

    fn title(&self, document: &Document) -> Option<String>;

    /// Price in whole currency units, truncated
    fn price(&self, document: &Document) -> Option<i64>;

    /// Image URL of a price rendered as a picture
    fn price_url(&self, document: &Document) -> Option<String>;

    fn stock(&self, document: &Document) -> Option<u32>;

    fn image_url(&self, document: &Document) -> Option<String>;

    fn desc(&self, document: &Document) -> Option<String>;

    fn score(&self, document: &Document) -> Option<u32>;

    fn product_code(&self, document: &Document) -> Option<String>;

    fn standard(&self, document: &Document) -> Option<String>;

    fn comments(&self, document: &Document) -> Vec<Comment>;

    fn end_product(&self, document: &Document) -> Option<String>;

    fn merchant(&self, document: &Document) -> Option<String>;

    fn brand(&self, document: &Document) -> Option<String>;

    fn brand_type(&self, document: &Document) -> Option<String>;

    /// Breadcrumb categories, outermost first
    fn belongs_to_categories(&self, document: &Document) -> Vec<Category>;

    /// Assembles every attribute of the page
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed detail page
    /// * `product_url_id` - ID of the product-URL record the page came from
    fn attributes(&self, document: &Document, product_url_id: i64) -> ProductAttributes {
        ProductAttributes {
            kind: self.site(),
            title: self.title(document),
            price: self.price(document),
            price_url: self.price_url(document),
            stock: self.stock(document),
            image_url: self.image_url(document),
            desc: self.desc(document),
            score: self.score(document),
            product_code: self.product_code(document),
            standard: self.standard(document),
            comments: self.comments(document),
            end_product: self.end_product(document),
            merchant: self.merchant(document),
            brand: self.brand(document),
            brand_type: self.brand_type(document),
            belongs_to_categories: self.belongs_to_categories(document),
            product_url_id,
        }
    }
}

/// Parses a displayed price such as `￥999.90` into whole units
///
/// The fractional part is discarded, not rounded.
///
/// # Examples
///
/// ```
/// use mall_spider::parser::parse_price;
///
/// assert_eq!(parse_price("￥999"), Some(999));
/// assert_eq!(parse_price("￥12.99"), Some(12));
/// assert_eq!(parse_price("invalid"), None);
/// assert_eq!(parse_price(""), None);
/// ```
pub fn parse_price(text: &str) -> Option<i64> {
    let cleaned = text.replace(['￥', '¥'], "");
    let value: f64 = cleaned.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc() as i64)
}

/// Counts the images whose `src` contains `marker`
pub fn count_marker_images(images: &[ElementRef<'_>], marker: &str) -> u32 {
    let count = images
        .iter()
        .filter(|img| attr(**img, "src").is_some_and(|src| src.contains(marker)))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Parses a review timestamp, trying a bare date and then date and time
///
/// Falls back to the current local time.
pub fn parse_publish_at(text: &str) -> NaiveDateTime {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok())
        .unwrap_or_else(|| Local::now().naive_local())
}

/// Reads the first number embedded in an element's class list (`sa5` -> 5)
fn class_digits(element: Option<ElementRef<'_>>) -> u32 {
    element
        .and_then(|el| first_digit_run(&class_string(el)))
        .unwrap_or(0)
}

/// Pads a positional list lookup: the `index`-th element or `None`
fn nth<'a>(elements: &[ElementRef<'a>], index: usize) -> Option<ElementRef<'a>> {
    elements.get(index).copied()
}
