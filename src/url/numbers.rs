//! Numeric extraction from free-form page text
//!
//! Page counters on the supported sites look like `共 10 页`, `1/5` or
//! `第1/12页`. Every paginater reduces its counter to one of the two helpers
//! below.

/// Parses the first run of ASCII digits in `text`
///
/// Returns `None` if there is no digit or the run does not fit in a `u32`.
///
/// # Examples
///
/// ```
/// use mall_spider::url::first_digit_run;
///
/// assert_eq!(first_digit_run("共 10 页"), Some(10));
/// assert_eq!(first_digit_run("none"), None);
/// ```
pub fn first_digit_run(text: &str) -> Option<u32> {
    digit_runs(text).next()?.parse().ok()
}

/// Parses the number in the last `/`-delimited segment of `text`
///
/// The segment may carry surrounding text (`1/5页`); its first digit run is
/// used.
///
/// # Examples
///
/// ```
/// use mall_spider::url::last_slash_number;
///
/// assert_eq!(last_slash_number("1/5"), Some(5));
/// assert_eq!(last_slash_number(" 2 / 12 页"), Some(12));
/// ```
pub fn last_slash_number(text: &str) -> Option<u32> {
    text.rsplit('/').next().and_then(first_digit_run)
}

/// Iterates over every maximal run of ASCII digits in `text`
pub fn digit_runs(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

/// Page counts above this are almost always a garbled counter
pub const SUSPICIOUS_PAGE_COUNT: u32 = 10_000;

/// Turns a detected page count into the number of pages to generate
///
/// A missing or zero count means a single page.
pub fn page_count(detected: Option<u32>) -> u32 {
    let count = detected.unwrap_or(1).max(1);
    if count > SUSPICIOUS_PAGE_COUNT {
        tracing::warn!("Listing reports {} pages, above {}", count, SUSPICIOUS_PAGE_COUNT);
    }
    count
}
