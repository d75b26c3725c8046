use crate::document::{raw_text, Document};
use crate::paginater::Paginater;
use crate::url::{first_digit_run, page_count};

/// Dangdang listings show the total page count in `#all_num`
pub struct DangdangPaginater;

impl Paginater for DangdangPaginater {
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String> {
        let detected = document
            .select_one("#all_num")
            .and_then(|el| first_digit_run(&raw_text(el)));
        let max_page = page_count(detected);

        (1..=max_page).map(|i| format!("{}&p={}", url, i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://category.dangdang.com/list?cat=4001976";

    fn paginate(html: &str) -> Vec<String> {
        DangdangPaginater.pagination_list(URL, &Document::parse(html))
    }

    #[test]
    fn test_pages_from_counter() {
        let urls = paginate(r#"<html><body><span id="all_num">共 3 页</span></body></html>"#);
        assert_eq!(
            urls,
            vec![format!("{URL}&p=1"), format!("{URL}&p=2"), format!("{URL}&p=3")]
        );
    }

    #[test]
    fn test_missing_counter_is_single_page() {
        let urls = paginate("<html><body></body></html>");
        assert_eq!(urls, vec![format!("{URL}&p=1")]);
    }

    #[test]
    fn test_counter_without_digits_is_single_page() {
        let urls = paginate(r#"<html><body><span id="all_num">共页</span></body></html>"#);
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn test_zero_counter_is_single_page() {
        let urls = paginate(r#"<html><body><span id="all_num">0</span></body></html>"#);
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn test_page_i_encodes_i_plus_one() {
        let urls = paginate(r#"<html><body><span id="all_num">10</span></body></html>"#);
        assert_eq!(urls.len(), 10);
        for (i, url) in urls.iter().enumerate() {
            assert!(url.ends_with(&format!("&p={}", i + 1)));
        }
    }
}
