use crate::document::{raw_text, Document};
use crate::paginater::Paginater;
use crate::url::{last_slash_number, page_count, split_underscore_segments};

const SEARCH_URL: &str = "http://www.suning.com/webapp/wcs/stores/servlet/odeSearch";

/// Suning category URLs encode their store, catalog and category IDs as
/// underscore-separated segments; listing pages are served by a search
/// servlet with a zero-based `currentPage`.
pub struct SuningPaginater;

/// IDs carried by a Suning category URL
#[derive(Debug, Default, PartialEq, Eq)]
struct CategoryIds<'a> {
    store_id: &'a str,
    catalog_id: &'a str,
    is_catalog_search: &'a str,
    category_id: &'a str,
}

impl<'a> CategoryIds<'a> {
    fn from_url(url: &'a str) -> Self {
        let trimmed = url.strip_suffix(".html").unwrap_or(url);
        let segments = split_underscore_segments(trimmed);
        let segment = |i: usize| segments.get(i).copied().unwrap_or_default();
        Self {
            store_id: segment(1),
            catalog_id: segment(2),
            is_catalog_search: segment(3),
            category_id: segment(4),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}?storeId={}&catalogId={}&categoryId={}&suggestionWordList=&isCatalogSearch={}",
            SEARCH_URL, self.store_id, self.catalog_id, self.category_id, self.is_catalog_search
        )
    }
}

impl Paginater for SuningPaginater {
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String> {
        let base = CategoryIds::from_url(url).search_url();

        let detected = document
            .select_one("#pagetop span")
            .and_then(|el| last_slash_number(&raw_text(el)));
        let max_page = page_count(detected);

        (1..=max_page)
            .map(|i| format!("{}&currentPage={}", base, i - 1))
            .collect()
    }
}
