use crate::document::{attr, stripped_text, Document};
use crate::parser::{parse_price, Category, Comment, Parser};
use crate::site::Site;

pub struct TmallParser;

impl Parser for TmallParser {
    fn site(&self) -> Site {
        Site::Tmall
    }

    fn title(&self, document: &Document) -> Option<String> {
        document.select_one("#detail h3 a").map(stripped_text)
    }

    fn price(&self, document: &Document) -> Option<i64> {
        document
            .select_one("#J_StrPrice")
            .and_then(|el| parse_price(&stripped_text(el)))
    }

    fn price_url(&self, _document: &Document) -> Option<String> {
        None
    }

    fn stock(&self, document: &Document) -> Option<u32> {
        let stock = document
            .select_one("#J_SpanStock")
            .and_then(|el| stripped_text(el).parse().ok())
            .unwrap_or(0);
        Some(stock)
    }

    fn image_url(&self, document: &Document) -> Option<String> {
        document
            .select_one("#J_ImgBooth")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn desc(&self, _document: &Document) -> Option<String> {
        None
    }

    // Ratings live on a separate taobao endpoint.
    fn score(&self, _document: &Document) -> Option<u32> {
        Some(0)
    }

    fn product_code(&self, _document: &Document) -> Option<String> {
        None
    }

    fn standard(&self, document: &Document) -> Option<String> {
        document.select_one(".attributes-list").map(|el| el.html())
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

    fn belongs_to_categories(&self, _document: &Document) -> Vec<Category> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r##"<html><body>
        <div id="detail"><h3><a href="#"> Galaxy S3 </a></h3></div>
        <strong id="J_StrPrice">3999.00</strong>
        <span id="J_SpanStock">27</span>
        <img id="J_ImgBooth" src="http://img01.taobaocdn.com/s3.jpg">
        <ul class="attributes-list"><li>品牌: Samsung</li></ul>
    </body></html>"##;

    #[test]
    fn test_fields() {
        let doc = Document::parse(PRODUCT_PAGE);
        assert_eq!(TmallParser.title(&doc), Some("Galaxy S3".to_string()));
        assert_eq!(TmallParser.price(&doc), Some(3999));
        assert_eq!(TmallParser.stock(&doc), Some(27));
        assert_eq!(
            TmallParser.image_url(&doc),
            Some("http://img01.taobaocdn.com/s3.jpg".to_string())
        );
        assert_eq!(TmallParser.score(&doc), Some(0));
        let standard = TmallParser.standard(&doc).unwrap();
        assert!(standard.starts_with("<ul class=\"attributes-list\">"));
    }

    #[test]
    fn test_unparseable_stock_is_zero() {
        let doc = Document::parse(r#"<html><body><span id="J_SpanStock">many</span></body></html>"#);
        assert_eq!(TmallParser.stock(&doc), Some(0));
        assert_eq!(TmallParser.stock(&Document::parse("<html></html>")), Some(0));
    }

    #[test]
    fn test_missing_markup() {
        let attrs = TmallParser.attributes(&Document::parse("<html></html>"), 3);
        assert_eq!(attrs.kind, Site::Tmall);
        assert_eq!(attrs.title, None);
        assert_eq!(attrs.price, None);
        assert_eq!(attrs.standard, None);
        assert!(attrs.comments.is_empty());
        assert!(attrs.belongs_to_categories.is_empty());
    }
}
