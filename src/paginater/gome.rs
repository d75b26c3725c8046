use crate::document::{raw_text, Document};
use crate::paginater::Paginater;
use crate::url::{digit_runs, last_slash_number, map_to_query, page_count, QueryMap};

const SEARCH_URL: &str = "http://search.gome.com.cn/product.do";

/// Gome category URLs carry the top-level category, category and category
/// level as the first three numbers in the URL; listing pages come from the
/// product search endpoint.
pub struct GomePaginater;

impl GomePaginater {
    fn search_query(url: &str) -> QueryMap {
        let mut ids = digit_runs(url);
        let mut query = QueryMap::new();
        query.insert("topCtgyId", ids.next().unwrap_or_default());
        query.insert("ctgyId", ids.next().unwrap_or_default());
        query.insert("order", 3);
        query.insert("ctgLevel", ids.next().unwrap_or_default());
        query.insert("scopes", "");
        query
    }
}

impl Paginater for GomePaginater {
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String> {
        let mut query = Self::search_query(url);

        let detected = document
            .select_one(".thispage")
            .and_then(|el| last_slash_number(&raw_text(el)));
        let max_page = page_count(detected);

        (1..=max_page)
            .map(|i| {
                query.insert("p", i);
                format!("{}?{}", SEARCH_URL, map_to_query(&query))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://www.gome.com.cn/products/10000000-10000012-10000070.html";

    #[test]
    fn test_search_urls() {
        let doc = Document::parse(r#"<html><body><span class="thispage">1/3</span></body></html>"#);
        let urls = GomePaginater.pagination_list(URL, &doc);
        assert_eq!(urls.len(), 3);
        assert_eq!(
            urls[0],
            "http://search.gome.com.cn/product.do?topCtgyId=10000000&ctgyId=10000012&order=3&ctgLevel=10000070&scopes=&p=1"
        );
        assert!(urls[2].ends_with("&p=3"));
    }

    #[test]
    fn test_url_without_ids() {
        let urls = GomePaginater.pagination_list("http://www.gome.com.cn/", &Document::parse("<html></html>"));
        assert_eq!(
            urls,
            vec!["http://search.gome.com.cn/product.do?topCtgyId=&ctgyId=&order=3&ctgLevel=&scopes=&p=1"]
        );
    }

    #[test]
    fn test_unparseable_counter_is_single_page() {
        let doc = Document::parse(r#"<html><body><span class="thispage">第一页</span></body></html>"#);
        assert_eq!(GomePaginater.pagination_list(URL, &doc).len(), 1);
    }
}
