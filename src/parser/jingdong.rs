use crate::document::{attr, href, select_first_in, stripped_text, Document};
use crate::parser::{class_digits, Category, Comment, Parser};
use crate::site::Site;
use regex::Regex;
use std::sync::LazyLock;

/// Top-level category pages such as `http://www.360buy.com/electronic.html`
static CHANNEL_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"com/\w+\.html$").expect("valid channel regex"));

const PRODUCT_CODE_LABEL: &str = "商品编号：";

pub struct JingdongParser;

impl Parser for JingdongParser {
    fn site(&self) -> Site {
        Site::Jingdong
    }

    fn title(&self, document: &Document) -> Option<String> {
        document.select_one("div#name h1").map(stripped_text)
    }

    // Prices are rendered as an image; see `price_url`.
    fn price(&self, _document: &Document) -> Option<i64> {
        None
    }

    fn price_url(&self, document: &Document) -> Option<String> {
        document
            .select_one("strong.price img")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn stock(&self, document: &Document) -> Option<u32> {
        let text = document
            .select_one("#stocktext")
            .map(stripped_text)
            .unwrap_or_default();

        if text.contains("发货") {
            Some(1)
        } else if text.contains("售完") {
            Some(0)
        } else {
            tracing::info!("stock issue: unrecognized stock text {:?}", text);
            Some(0)
        }
    }

    fn image_url(&self, document: &Document) -> Option<String> {
        document
            .select_one("#preview img")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn desc(&self, document: &Document) -> Option<String> {
        document.select_one(".mc.fore.tabcon").map(|el| el.html())
    }

    /// The star widget encodes the rating in a class name such as `star4`
    fn score(&self, document: &Document) -> Option<u32> {
        let first = document
            .select_one("div[id^=star]")
            .and_then(|stars| select_first_in(stars, "div:first-child"));
        Some(class_digits(first))
    }

    fn product_code(&self, document: &Document) -> Option<String> {
        document
            .select_one("#summary li:first-child span")
            .map(|el| stripped_text(el).replace(PRODUCT_CODE_LABEL, ""))
    }

    fn standard(&self, document: &Document) -> Option<String> {
        document.select_one(".Ptable").map(|el| el.html())
    }

    // Reviews are served by a separate club service.
    fn comments(&self, _document: &Document) -> Vec<Comment> {
        Vec::new()
    }

    fn end_product(&self, _document: &Document) -> Option<String> {
        None
    }

    fn merchant(&self, _document: &Document) -> Option<String> {
        None
    }

    fn brand(&self, _document: &Document) -> Option<String> {
        None
    }

    fn brand_type(&self, _document: &Document) -> Option<String> {
        None
    }

    fn belongs_to_categories(&self, document: &Document) -> Vec<Category> {
        document
            .select(".crumb a")
            .into_iter()
            .filter_map(|el| {
                let url = href(el)
                    .filter(|h| h.contains("products") || CHANNEL_PAGE.is_match(h))?;
                Some(Category {
                    name: stripped_text(el),
                    url: url.to_string(),
                })
            })
            .collect()
    }
}
