use crate::document::Document;
use crate::paginater::{max_numeric, Paginater};
use crate::url::{insert_before_extension, page_count};

/// Newegg page links wrap their numbers in nested markup, so every text node
/// below a `.pageNav` anchor is considered on its own.
pub struct NeweggPaginater;

impl Paginater for NeweggPaginater {
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String> {
        let detected = max_numeric(
            document
                .select(".pageNav a")
                .into_iter()
                .flat_map(|link| link.text()),
        );
        let max_page = page_count(detected);

        (1..=max_page)
            .map(|i| insert_before_extension(url, ".htm", &format!("-{}", i)))
            .collect()
    }
}
