//! Query-string codec
//!
//! Converts between a raw query string and an insertion-ordered key/value
//! map. No percent-decoding or encoding is performed: values are carried as
//! the raw text found in the URL, so a decode/encode round trip reproduces
//! the original query.

use std::fmt;

/// An insertion-ordered map of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the map holds no keys
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl fmt::Display for QueryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&map_to_query(self))
    }
}

/// Parses a query string (without the leading `?`) into a [`QueryMap`]
///
/// Tokens are split on `&` and then on the first `=`. A token without `=`
/// becomes a key with an empty value and empty tokens are skipped. A repeated
/// key keeps its first position and takes the last value.
///
/// # Examples
///
/// ```
/// use mall_spider::url::query_to_map;
///
/// let map = query_to_map("cat=1&n=60&flag");
/// assert_eq!(map.get("n"), Some("60"));
/// assert_eq!(map.get("flag"), Some(""));
/// ```
pub fn query_to_map(query: &str) -> QueryMap {
    let mut map = QueryMap::new();
    for token in query.split('&').filter(|t| !t.is_empty()) {
        match token.split_once('=') {
            Some((key, value)) => map.insert(key, value),
            None => map.insert(token, ""),
        }
    }
    map
}

/// Serializes a [`QueryMap`] as `key=value` pairs joined by `&`
///
/// # Examples
///
/// ```
/// use mall_spider::url::{map_to_query, query_to_map};
///
/// let query = "q=phone&s=0&n=60";
/// assert_eq!(map_to_query(&query_to_map(query)), query);
/// ```
pub fn map_to_query(map: &QueryMap) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order() {
        let map = query_to_map("z=1&a=2&m=3");
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_round_trip() {
        for query in [
            "",
            "a=1",
            "a=1&b=2",
            "cat=50024400&s=60&n=60&sort=s",
            "q=%E6%89%8B%E6%9C%BA&x=a+b",
            "empty=&full=yes",
        ] {
            assert_eq!(map_to_query(&query_to_map(query)), query, "query {}", query);
        }
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let map = query_to_map("redirect=a=b&c=d");
        assert_eq!(map.get("redirect"), Some("a=b"));
        assert_eq!(map.get("c"), Some("d"));
    }

    #[test]
    fn test_malformed_token_becomes_empty_value() {
        let map = query_to_map("lonely&a=1");
        assert_eq!(map.get("lonely"), Some(""));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_empty_tokens_skipped() {
        let map = query_to_map("a=1&&b=2&");
        assert_eq!(map.len(), 2);
        assert_eq!(map_to_query(&map), "a=1&b=2");
    }

    #[test]
    fn test_duplicate_key_keeps_first_position() {
        let map = query_to_map("a=1&b=2&a=3");
        assert_eq!(map_to_query(&map), "a=3&b=2");
    }

    #[test]
    fn test_no_percent_decoding() {
        let map = query_to_map("q=a%20b");
        assert_eq!(map.get("q"), Some("a%20b"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = query_to_map("s=0&n=60");
        map.insert("s", 120);
        map.insert("sort", "d");
        assert_eq!(map.to_string(), "s=120&n=60&sort=d");
    }

    #[test]
    fn test_from_iterator() {
        let map: QueryMap = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(map_to_query(&map), "a=1&b=2");
        assert!(!map.is_empty());
    }
}
