use crate::document::{attr, href, stripped_text, Document};
use crate::parser::{class_digits, Category, Comment, Parser};
use crate::site::Site;

/// Breadcrumb links are relative to the site root (`../category/...`)
const ORIGIN: &str = "http://www.gome.com.cn";

pub struct GomeParser;

impl Parser for GomeParser {
    fn site(&self) -> Site {
        Site::Gome
    }

    fn title(&self, document: &Document) -> Option<String> {
        document.select_one("#name").map(stripped_text)
    }

    // Prices are rendered as an image; see `price_url`.
    fn price(&self, _document: &Document) -> Option<i64> {
        None
    }

    fn price_url(&self, document: &Document) -> Option<String> {
        document
            .select_one("#gomeprice img")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn stock(&self, _document: &Document) -> Option<u32> {
        Some(1)
    }

    fn image_url(&self, document: &Document) -> Option<String> {
        document
            .select_one(".p_img_bar img")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn desc(&self, document: &Document) -> Option<String> {
        document.select_one(".description").map(|el| el.inner_html())
    }

    fn score(&self, document: &Document) -> Option<u32> {
        Some(class_digits(document.select_one("#positive div.star")))
    }

    fn product_code(&self, document: &Document) -> Option<String> {
        document.select_one("#sku").map(stripped_text)
    }

    fn standard(&self, document: &Document) -> Option<String> {
        document.select_one(".Ptable").map(|el| el.inner_html())
    }

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

    /// Navigation links minus the home page and brand pages
    fn belongs_to_categories(&self, document: &Document) -> Vec<Category> {
        document
            .select("#navigation a")
            .into_iter()
            .filter_map(|el| {
                let url = href(el).filter(|h| !h.contains("index") && !h.contains("brand"))?;
                Some(Category {
                    name: stripped_text(el),
                    url: url.replace("..", ORIGIN),
                })
            })
            .collect()
    }
}
