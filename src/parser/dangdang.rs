use crate::document::{attr, href, raw_text, select_in, stripped_text, Document};
use crate::parser::{
    count_marker_images, nth, parse_price, parse_publish_at, Category, Comment, Parser,
};
use crate::site::Site;

/// Shown when a product page has no main picture
const DEFAULT_IMAGE_URL: &str = "http://img32.ddimg.cn/7/35/60129142-1_h.jpg";

/// Rating stars are images; filled ones have `red` in their file name
const FILLED_STAR: &str = "red";

pub struct DangdangParser;

impl Parser for DangdangParser {
    fn site(&self) -> Site {
        Site::Dangdang
    }

    fn title(&self, document: &Document) -> Option<String> {
        document.select_one("div.dp_wrap h1").map(stripped_text)
    }

    fn price(&self, document: &Document) -> Option<i64> {
        document
            .select_one("#salePriceTag")
            .and_then(|el| parse_price(&stripped_text(el)))
    }

    fn price_url(&self, _document: &Document) -> Option<String> {
        None
    }

    // Stock is loaded by a separate callback request on the live site.
    fn stock(&self, _document: &Document) -> Option<u32> {
        Some(1)
    }

    fn image_url(&self, document: &Document) -> Option<String> {
        let src = document
            .select_one("#largePic")
            .and_then(|img| attr(img, "src"))
            .unwrap_or(DEFAULT_IMAGE_URL);
        Some(src.to_string())
    }

    fn desc(&self, _document: &Document) -> Option<String> {
        None
    }

    fn score(&self, document: &Document) -> Option<u32> {
        Some(count_marker_images(
            &document.select("p.fraction img"),
            FILLED_STAR,
        ))
    }

    fn product_code(&self, _document: &Document) -> Option<String> {
        None
    }

    fn standard(&self, _document: &Document) -> Option<String> {
        None
    }

    /// Reviews are laid out as four parallel lists (titles, bodies, times and
    /// star groups) that are paired by position. The title list drives the
    /// result; a shorter list pads with an empty body, the current time or
    /// zero stars rather than dropping the review.
    fn comments(&self, document: &Document) -> Vec<Comment> {
        let titles = document.select("#comm_all h5 a");
        let contents = document.select("#comm_all div.text");
        let times = document.select("#comm_all .title .time");
        let stars = document.select("#comm_all .title .star");

        (0..titles.len())
            .map(|i| {
                let title = nth(&titles, i).map(stripped_text).unwrap_or_default();

                let content = nth(&contents, i)
                    .map(|el| strip_timestamp_prefix(&stripped_text(el)).to_string())
                    .unwrap_or_default();

                let publish_at = parse_publish_at(
                    &nth(&times, i).map(stripped_text).unwrap_or_default(),
                );

                let star = nth(&stars, i)
                    .map(|group| count_marker_images(&select_in(group, "img"), FILLED_STAR))
                    .unwrap_or(0);

                Comment {
                    title,
                    content,
                    publish_at,
                    star,
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

    /// Only breadcrumb links to listing pages count as categories
    fn belongs_to_categories(&self, document: &Document) -> Vec<Category> {
        document
            .select(".crumb a")
            .into_iter()
            .filter_map(|el| {
                let url = href(el).filter(|h| h.contains("list"))?;
                Some(Category {
                    name: raw_text(el).trim().to_string(),
                    url: url.to_string(),
                })
            })
            .collect()
    }
}

/// Review bodies start with their posting time; drop it
fn strip_timestamp_prefix(content: &str) -> &str {
    content.trim_start_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_digit() || c == ':' || c == '-'
    })
}
