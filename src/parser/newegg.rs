use crate::document::{attr, select_first_in, select_in, stripped_text, Document};
use crate::parser::{parse_publish_at, Category, Comment, Parser};
use crate::site::Site;

const IN_STOCK: &str = "有货";

pub struct NeweggParser;

impl Parser for NeweggParser {
    fn site(&self) -> Site {
        Site::Newegg
    }

    fn title(&self, document: &Document) -> Option<String> {
        document.select_one(".proHeader h1").map(stripped_text)
    }

    // Prices are rendered as an image; see `price_url`.
    fn price(&self, _document: &Document) -> Option<i64> {
        None
    }

    fn price_url(&self, document: &Document) -> Option<String> {
        document
            .select_one(".neweggPrice img")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn stock(&self, document: &Document) -> Option<u32> {
        let in_stock = document
            .select_one(".detailList span.lightly")
            .is_some_and(|el| stripped_text(el) == IN_STOCK);
        Some(u32::from(in_stock))
    }

    /// The large picture is linked, not embedded
    fn image_url(&self, document: &Document) -> Option<String> {
        document
            .select_one("a#bigImg")
            .and_then(|link| attr(link, "href"))
            .map(str::to_string)
    }

    fn desc(&self, _document: &Document) -> Option<String> {
        None
    }

    // The rating is shown as decimal text, which is not a star count.
    fn score(&self, _document: &Document) -> Option<u32> {
        None
    }

    fn product_code(&self, _document: &Document) -> Option<String> {
        None
    }

    fn standard(&self, document: &Document) -> Option<String> {
        document.select_one(".proDescTab table").map(|el| el.html())
    }

    /// Each review is a self-contained `.listCell`; a review body spans
    /// several text blocks, joined by newlines.
    fn comments(&self, document: &Document) -> Vec<Comment> {
        document
            .select("#comment_1 .listCell")
            .into_iter()
            .map(|cell| {
                let title = select_first_in(cell, ".title h2")
                    .map(stripped_text)
                    .unwrap_or_default();
                let publish_at = parse_publish_at(
                    &select_first_in(cell, ".pubDate")
                        .map(stripped_text)
                        .unwrap_or_default(),
                );
                let content = select_in(cell, ".content .textBlock")
                    .into_iter()
                    .map(stripped_text)
                    .collect::<Vec<_>>()
                    .join("\n");

                Comment {
                    title,
                    content,
                    publish_at,
                    star: 0,
                }
            })
            .collect()
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

    fn belongs_to_categories(&self, _document: &Document) -> Vec<Category> {
        Vec::new()
    }
}
