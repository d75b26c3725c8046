use crate::document::{attr, href, stripped_text, Document};
use crate::parser::{Category, Comment, Parser};
use crate::site::Site;
use crate::url::digit_runs;

/// Ratings are five stars, with the unfilled ones marked `noscore`
const MAX_SCORE: u32 = 5;

pub struct SuningParser;

impl Parser for SuningParser {
    fn site(&self) -> Site {
        Site::Suning
    }

    fn title(&self, document: &Document) -> Option<String> {
        document.select_one(".product_title_name").map(stripped_text)
    }

    fn price(&self, _document: &Document) -> Option<i64> {
        None
    }

    fn price_url(&self, _document: &Document) -> Option<String> {
        None
    }

    fn stock(&self, document: &Document) -> Option<u32> {
        let in_stock = document
            .select_one("#deleverStatus")
            .is_some_and(|el| stripped_text(el).contains("现货"));
        Some(u32::from(in_stock))
    }

    fn image_url(&self, document: &Document) -> Option<String> {
        document
            .select_one(".product_b_image img")
            .and_then(|img| attr(img, "src"))
            .map(str::to_string)
    }

    fn desc(&self, _document: &Document) -> Option<String> {
        None
    }

    fn score(&self, document: &Document) -> Option<u32> {
        let empty = document.select(".sn_stars em.noscore").len();
        let empty = u32::try_from(empty).unwrap_or(u32::MAX);
        Some(MAX_SCORE.saturating_sub(empty))
    }

    /// The code is the first number in the `商品编码：123456` label
    fn product_code(&self, document: &Document) -> Option<String> {
        let label = stripped_text(document.select_one(".product_title_cout")?);
        let code = digit_runs(&label).next().map(str::to_string);
        code
    }

    // Specifications are not published on the product page.
    fn standard(&self, _document: &Document) -> Option<String> {
        Some(String::new())
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

    fn belongs_to_categories(&self, document: &Document) -> Vec<Category> {
        document
            .select(".path a")
            .into_iter()
            .filter_map(|el| {
                let url = href(el).filter(|h| h.contains("html"))?;
                Some(Category {
                    name: stripped_text(el),
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r#"<html><body>
        <div class="path">
            <a href="http://www.suning.com/">苏宁易购</a>
            <a href="http://www.suning.com/emall/pcd_10052_10051_20006_.html">手机</a>
            <a href="javascript:void(0)">more</a>
        </div>
        <h1 class="product_title_name"> iPhone 4S </h1>
        <span class="product_title_cout">商品编码：102345678</span>
        <div id="deleverStatus">现货</div>
        <div class="product_b_image"><img src="http://image.suning.cn/b/1.jpg"></div>
        <div class="sn_stars"><em></em><em></em><em></em><em class="noscore"></em><em class="noscore"></em></div>
    </body></html>"#;

    #[test]
    fn test_fields() {
        let doc = Document::parse(PRODUCT_PAGE);
        assert_eq!(SuningParser.title(&doc), Some("iPhone 4S".to_string()));
        assert_eq!(SuningParser.stock(&doc), Some(1));
        assert_eq!(
            SuningParser.image_url(&doc),
            Some("http://image.suning.cn/b/1.jpg".to_string())
        );
        assert_eq!(SuningParser.product_code(&doc), Some("102345678".to_string()));
        assert_eq!(SuningParser.standard(&doc), Some(String::new()));
    }

    #[test]
    fn test_score_subtracts_empty_stars() {
        assert_eq!(SuningParser.score(&Document::parse(PRODUCT_PAGE)), Some(3));
        assert_eq!(SuningParser.score(&Document::parse("<html></html>")), Some(5));

        let crowded = format!(
            r#"<html><body><div class="sn_stars">{}</div></body></html>"#,
            r#"<em class="noscore"></em>"#.repeat(7)
        );
        assert_eq!(SuningParser.score(&Document::parse(&crowded)), Some(0));
    }

    #[test]
    fn test_product_code_longer_than_u32() {
        let doc = Document::parse(
            r#"<html><body><span class="product_title_cout">商品编码：000123456789012</span></body></html>"#,
        );
        assert_eq!(SuningParser.product_code(&doc), Some("000123456789012".to_string()));
    }

    #[test]
    fn test_missing_product_code() {
        let doc = Document::parse(r#"<html><body><span class="product_title_cout">无</span></body></html>"#);
        assert_eq!(SuningParser.product_code(&doc), None);
        assert_eq!(SuningParser.product_code(&Document::parse("<html></html>")), None);
    }

    #[test]
    fn test_categories() {
        let categories = SuningParser.belongs_to_categories(&Document::parse(PRODUCT_PAGE));
        assert_eq!(
            categories,
            vec![Category {
                name: "手机".to_string(),
                url: "http://www.suning.com/emall/pcd_10052_10051_20006_.html".to_string(),
            }]
        );
    }

    #[test]
    fn test_attributes() {
        let attrs = SuningParser.attributes(&Document::parse("<html></html>"), 5);
        assert_eq!(attrs.kind, Site::Suning);
        assert_eq!(attrs.stock, Some(0));
        assert_eq!(attrs.title, None);
    }
}
