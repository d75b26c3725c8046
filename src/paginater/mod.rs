//! Pagination generators
//!
//! A paginater looks at the first listing page of a category and produces
//! the URL of every listing page in that category, in ascending page order.
//! Each site stores its page count and page addressing differently:
//!
//! | Site | Page count | Page URL |
//! |------|------------|----------|
//! | dangdang | `#all_num` text | `&p={i}` appended |
//! | suning | `#pagetop span` "x/y" | search URL with `currentPage={i-1}` |
//! | jingdong | numeric `div.pagin a` texts | `-0-0-0-0-0-0-0-1-1-{i}.html` suffix |
//! | newegg | numeric `.pageNav a` text nodes | `-{i}.htm` suffix |
//! | tmall | `#totalPage` value | form action with `s = n * (i-1)` |
//! | gome | `.thispage` "x/y" | search URL with `p={i}` |
//!
//! All of them fall back to a single page when the count cannot be read.

mod dangdang;
mod gome;
mod jingdong;
mod newegg;
mod suning;
mod tmall;

pub use dangdang::DangdangPaginater;
pub use gome::GomePaginater;
pub use jingdong::JingdongPaginater;
pub use newegg::NeweggPaginater;
pub use suning::SuningPaginater;
pub use tmall::TmallPaginater;

use crate::document::Document;

/// Enumerates the listing pages of a category
pub trait Paginater: Send + Sync {
    /// Returns the URL of every listing page, page 1 first
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the category's first listing page was fetched from
    /// * `document` - That page, parsed
    ///
    /// The result always holds at least one URL.
    fn pagination_list(&self, url: &str, document: &Document) -> Vec<String>;
}

/// Largest integer among `texts`, ignoring anything that is not an integer
fn max_numeric<I, S>(texts: I) -> Option<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .filter_map(|text| text.as_ref().trim().parse::<u32>().ok())
        .max()
}
