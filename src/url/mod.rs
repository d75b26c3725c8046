//! URL handling module for Mall-Spider
//!
//! This module provides the query-string codec, numeric extraction helpers
//! used by the paginaters, and the small string rewrites the sites need to
//! turn one listing URL into the URL of another page.

mod numbers;
mod query;

pub use numbers::{digit_runs, first_digit_run, last_slash_number, page_count};
pub use query::{map_to_query, query_to_map, QueryMap};

use url::Url;

/// A URL split into the part before `?`, the raw query and the raw fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub base: &'a str,
    pub query: &'a str,
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Splits `url` without decoding anything
    pub fn split(url: &'a str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (base, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            base,
            query,
            fragment,
        }
    }

    /// Reassembles the URL with a replacement query
    pub fn with_query(&self, query: &str) -> String {
        let mut url = String::with_capacity(self.base.len() + query.len() + 2);
        url.push_str(self.base);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// Inserts `insert` in front of the last occurrence of `extension`
///
/// A URL without `extension` is returned unchanged.
///
/// # Examples
///
/// ```
/// use mall_spider::url::insert_before_extension;
///
/// assert_eq!(
///     insert_before_extension("http://x.com/list/2-1.htm", ".htm", "-3"),
///     "http://x.com/list/2-1-3.htm"
/// );
/// ```
pub fn insert_before_extension(url: &str, extension: &str, insert: &str) -> String {
    match url.rfind(extension) {
        Some(pos) => format!("{}{}{}", &url[..pos], insert, &url[pos..]),
        None => url.to_string(),
    }
}

/// Splits `text` on every `_` that is followed by a word character
///
/// An underscore at the end of the text, or followed by punctuation, stays
/// part of the current segment.
pub fn split_underscore_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c != '_' {
            continue;
        }
        let next_is_word = chars
            .peek()
            .is_some_and(|&(_, n)| n.is_alphanumeric() || n == '_');
        if next_is_word {
            segments.push(&text[start..idx]);
            start = idx + 1;
        }
    }
    segments.push(&text[start..]);
    segments
}

/// Resolves `href` against `base`, falling back to `href` itself
pub fn resolve(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parts_split() {
        let parts = UrlParts::split("http://x.com/a?b=1&c=2#top");
        assert_eq!(parts.base, "http://x.com/a");
        assert_eq!(parts.query, "b=1&c=2");
        assert_eq!(parts.fragment, Some("top"));
        assert_eq!(parts.with_query("s=0"), "http://x.com/a?s=0#top");
    }

    #[test]
    fn test_url_parts_without_query() {
        let parts = UrlParts::split("http://x.com/a");
        assert_eq!(parts.query, "");
        assert_eq!(parts.fragment, None);
        assert_eq!(parts.with_query(""), "http://x.com/a");
        assert_eq!(parts.with_query("p=2"), "http://x.com/a?p=2");
    }

    #[test]
    fn test_insert_before_last_extension() {
        assert_eq!(
            insert_before_extension("http://x.com/a.html/b.html", ".html", "-1"),
            "http://x.com/a.html/b-1.html"
        );
    }

    #[test]
    fn test_insert_before_missing_extension() {
        assert_eq!(
            insert_before_extension("http://x.com/a", ".html", "-1"),
            "http://x.com/a"
        );
    }

    #[test]
    fn test_split_underscore_segments() {
        assert_eq!(
            split_underscore_segments("http://x.com/a_b_Y_c_d"),
            vec!["http://x.com/a", "b", "Y", "c", "d"]
        );
    }

    #[test]
    fn test_split_underscore_keeps_trailing_and_punctuation() {
        assert_eq!(split_underscore_segments("a_"), vec!["a_"]);
        assert_eq!(split_underscore_segments("a_.b_c"), vec!["a_.b", "c"]);
        assert_eq!(split_underscore_segments("a__b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("http://www.360buy.com", "products/652-653-655.html"),
            "http://www.360buy.com/products/652-653-655.html"
        );
        assert_eq!(
            resolve("http://list.tmall.com/search.htm?a=1", "/go.htm?s=0"),
            "http://list.tmall.com/go.htm?s=0"
        );
        assert_eq!(resolve("not a url", "x"), "x");
    }
}
