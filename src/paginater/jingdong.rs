use crate::document::{raw_text, Document};
use crate::paginater::{max_numeric, Paginater};
use crate::url::{insert_before_extension, page_count};

/// Jingdong listing pages are addressed by a fixed block of filter segments
/// followed by the page number, inserted in front of `.html`.
pub struct JingdongPaginater;

impl Paginater for JingdongPaginater {
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String> {
        let detected = max_numeric(document.select("div.pagin a").into_iter().map(raw_text));
        let max_page = page_count(detected);

        (1..=max_page)
            .map(|i| insert_before_extension(url, ".html", &format!("-0-0-0-0-0-0-0-1-1-{}", i)))
            .collect()
    }
}
