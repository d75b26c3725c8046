use crate::document::{attr, Document};
use crate::paginater::Paginater;
use crate::url::{first_digit_run, map_to_query, page_count, query_to_map, resolve, UrlParts};

/// Tmall listings submit a filter form; every page is that form's action
/// with the result offset `s` set to `n * (page - 1)`, where `n` is the
/// page size carried in the same query.
pub struct TmallPaginater;

impl Paginater for TmallPaginater {
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String> {
        let detected = document
            .select_one("#totalPage")
            .and_then(|el| attr(el, "value"))
            .and_then(|value| value.trim().parse::<u32>().ok());
        let max_page = page_count(detected);

        let action = document
            .select_one("#filterPageForm")
            .and_then(|form| attr(form, "action"))
            .map(str::trim)
            .filter(|action| !action.is_empty())
            .map(|action| resolve(url, action))
            .unwrap_or_else(|| url.to_string());

        let parts = UrlParts::split(&action);
        let mut query = query_to_map(parts.query);
        let per_page = query
            .get("n")
            .and_then(first_digit_run)
            .map(u64::from)
            .unwrap_or(0);

        (1..=max_page)
            .map(|i| {
                query.insert("s", per_page * u64::from(i - 1));
                parts.with_query(&map_to_query(&query))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://list.tmall.com/search_product.htm?cat=50024400";

    fn page(total: &str, action: &str) -> Document {
        Document::parse(&format!(
            r#"<html><body>
                <input id="totalPage" type="hidden" value="{}">
                <form id="filterPageForm" action="{}"></form>
            </body></html>"#,
            total, action
        ))
    }

    #[test]
    fn test_offsets_from_page_size() {
        let doc = page("3", "http://list.tmall.com/search_product.htm?cat=50024400&s=0&n=60&sort=s");
        let urls = TmallPaginater.pagination_list(URL, &doc);
        assert_eq!(
            urls,
            vec![
                "http://list.tmall.com/search_product.htm?cat=50024400&s=0&n=60&sort=s",
                "http://list.tmall.com/search_product.htm?cat=50024400&s=60&n=60&sort=s",
                "http://list.tmall.com/search_product.htm?cat=50024400&s=120&n=60&sort=s",
            ]
        );
    }

    #[test]
    fn test_missing_page_size_keeps_offset_zero() {
        let doc = page("2", "http://list.tmall.com/search_product.htm?cat=1");
        let urls = TmallPaginater.pagination_list(URL, &doc);
        assert_eq!(
            urls,
            vec![
                "http://list.tmall.com/search_product.htm?cat=1&s=0",
                "http://list.tmall.com/search_product.htm?cat=1&s=0",
            ]
        );
    }

    #[test]
    fn test_relative_action_resolved_against_listing() {
        let doc = page("2", "/search_product.htm?n=20&s=0");
        let urls = TmallPaginater.pagination_list(URL, &doc);
        assert_eq!(urls[1], "http://list.tmall.com/search_product.htm?n=20&s=20");
    }

    #[test]
    fn test_missing_form_and_total_uses_listing_url() {
        let urls = TmallPaginater.pagination_list(URL, &Document::parse("<html></html>"));
        assert_eq!(urls, vec![format!("{URL}&s=0")]);
    }

    #[test]
    fn test_unparseable_total_is_single_page() {
        let doc = page("lots", "http://list.tmall.com/search_product.htm?n=60");
        assert_eq!(TmallPaginater.pagination_list(URL, &doc).len(), 1);
    }
}
