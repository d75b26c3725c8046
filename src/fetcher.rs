//! Root category fetchers
//!
//! Each site publishes its category tree somewhere different: an HTML
//! "all categories" page, a JavaScript data file, or a JSONP-like feed. A
//! fetcher names that source and turns its body into the root categories the
//! paginaters start from.

use crate::document::{href, stripped_text, Document};
use crate::parser::Category;
use crate::site::Site;
use crate::url::resolve;
use crate::{Result, SpiderError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Produces the root categories of one site
pub trait Fetcher: Send + Sync {
    /// Where the category tree is published
    fn source_url(&self) -> &'static str;

    /// Extracts categories from the downloaded source
    ///
    /// # Arguments
    ///
    /// * `body` - The decoded body of [`Fetcher::source_url`]
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Category>)` - The root categories
    /// * `Err(SpiderError::LayoutChanged)` - The source no longer has the expected shape
    fn category_list(&self, body: &str) -> Result<Vec<Category>>;
}

/// Collects `(stripped text, href)` for every anchor matching `css`
fn anchors(document: &Document, css: &str) -> Vec<(String, String)> {
    document
        .select(css)
        .into_iter()
        .filter_map(|el| Some((stripped_text(el), href(el)?.trim().to_string())))
        .collect()
}

pub struct DangdangFetcher;

const DANGDANG_FEED_START: &str = "json_category=";
const DANGDANG_FEED_END: &str = "menudataloaded";

#[derive(Debug, Deserialize)]
struct DangdangEntry {
    n: String,
    u: String,
}

impl Fetcher for DangdangFetcher {
    fn source_url(&self) -> &'static str {
        "http://www.dangdang.com/Found/category.js"
    }

    /// The feed is a script assigning a JSON object to `json_category`;
    /// entries are keyed by an opaque ID and abbreviate the domain as `#dd#`.
    fn category_list(&self, body: &str) -> Result<Vec<Category>> {
        let layout_changed = |message: &str| SpiderError::LayoutChanged {
            site: Site::Dangdang,
            message: message.to_string(),
        };

        let (_, feed) = body
            .split_once(DANGDANG_FEED_START)
            .ok_or_else(|| layout_changed("category feed marker not found"))?;
        let (feed, _) = feed
            .split_once(DANGDANG_FEED_END)
            .ok_or_else(|| layout_changed("category feed terminator not found"))?;

        let json = match (feed.find('{'), feed.rfind('}')) {
            (Some(start), Some(end)) if start < end => &feed[start..=end],
            _ => return Err(layout_changed("category feed holds no JSON object")),
        };

        let entries: BTreeMap<String, DangdangEntry> = serde_json::from_str(json)?;

        Ok(entries
            .into_values()
            .map(|entry| Category {
                name: entry.n,
                url: format!("http://{}", entry.u.replace("#dd#", ".dangdang.com/")),
            })
            .filter(|category| category.url.contains("list?cat"))
            .collect())
    }
}

pub struct JingdongFetcher;

const JINGDONG_ORIGIN: &str = "http://www.360buy.com";

impl Fetcher for JingdongFetcher {
    fn source_url(&self) -> &'static str {
        "http://www.360buy.com/allSort.aspx"
    }

    fn category_list(&self, body: &str) -> Result<Vec<Category>> {
        let document = Document::parse(body);
        Ok(anchors(&document, r#"div.mc em a[href^="products"]"#)
            .into_iter()
            .map(|(name, href)| Category {
                name,
                url: resolve(JINGDONG_ORIGIN, &href),
            })
            .collect())
    }
}

pub struct TmallFetcher;

/// Listing pages that never render
const TMALL_BLACKLIST: [&str; 2] = [
    "http://list.tmall.com/50025135/g,guydamrvge2dkorxga4tmmbmguydamrzgyzdoorwgyzdmnjmguydamrvg44dgorugmzdsnzmguydamrvgi3dkorshe2tiojmguydamrvg44diorugyytinzmguydamrvg44dsorsga4tcnjmguydamrvg44dqorsgeztgnbmguydamrvgizdoorsgi3tkojmguydamrvgi3dgorrge4dcojmguydamrvgi2tqortge4tonjmguydamrvgi3teorygi2tolbvgaydenjsgy3dumzvgu2dglbvgaydenjsgmztunrwgizcynjqgaztcmzzg45dcmbsgy4cynjqga2dqnrsha5dsmzugywdkmbqgi2toobxhiytinjqgiwdkmbqgi2tqmrrhizdenjqgywdkmbqgi3tenbthiztenrzfq2tambsguytkmr2gy3tanrmguydanbxge3daorsguytanrmguydanbxgm2tmorrha3dsmzmguydanbxgm2toorrhe4dmnzmguydamrvg44tkoruhe2dklbvgaydenjyga3dumzqge3synjqgazdkobsg45dgmzrgawdkmbqgi2tqmrvhiytcnjsgywdkmbqgi2tqmzxhiytanbxfq2tambwgq3donr2gyztombm--0----------------------g-d-----40-0--50025233-x.htm?is=cate",
    "http://list.tmall.com/50024897/g-s--99---40-0--50026022-x.htm?TBG=19622.15482.57",
];

static TMALL_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("valid group regex"));
static TMALL_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""class".*?\}"#).expect("valid class regex"));
static TMALL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name\s*:\s*"([^"]+)""#).expect("valid name regex"));
static TMALL_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*:\s*"([^"]+)""#).expect("valid href regex"));

impl Fetcher for TmallFetcher {
    fn source_url(&self) -> &'static str {
        "http://www.tmall.com/go/rgn/mall/iwanttobuy-data.php?d=20110910"
    }

    /// The feed is a list of JavaScript object literals wrapped in
    /// parentheses; only `name` and `href` are read from each.
    fn category_list(&self, body: &str) -> Result<Vec<Category>> {
        Ok(TMALL_GROUP
            .captures_iter(body)
            .filter_map(|group| {
                let literal = TMALL_CLASS.replace_all(&group[1], "}");
                let name = TMALL_NAME.captures(&literal)?[1].to_string();
                let url = TMALL_HREF.captures(&literal)?[1].to_string();
                Some(Category { name, url })
            })
            .filter(|category| {
                category.url.starts_with("http://list.tmall.com")
                    && !category.url.contains("catid_count")
                    && !TMALL_BLACKLIST.contains(&category.url.as_str())
            })
            .collect())
    }
}

pub struct NeweggFetcher;

impl Fetcher for NeweggFetcher {
    fn source_url(&self) -> &'static str {
        "http://www.newegg.com.cn/CategoryList.htm"
    }

    fn category_list(&self, body: &str) -> Result<Vec<Category>> {
        let document = Document::parse(body);
        Ok(anchors(&document, ".allCateList dd a")
            .into_iter()
            .map(|(name, url)| Category { name, url })
            .collect())
    }
}

pub struct SuningFetcher;

const SUNING_ORIGIN: &str = "http://www.suning.com";

impl Fetcher for SuningFetcher {
    fn source_url(&self) -> &'static str {
        "http://www.suning.com/webapp/wcs/stores/servlet/SNProductCatgroupView?storeId=10052&catalogId=10051&flag=1"
    }

    fn category_list(&self, body: &str) -> Result<Vec<Category>> {
        let document = Document::parse(body);
        Ok(anchors(&document, ".contentmain .allProContent .cont-left a")
            .into_iter()
            .map(|(name, href)| Category {
                name,
                url: resolve(SUNING_ORIGIN, &href),
            })
            .collect())
    }
}

pub struct GomeFetcher;

impl Fetcher for GomeFetcher {
    fn source_url(&self) -> &'static str {
        "http://www.gome.com.cn/allSort.html"
    }

    fn category_list(&self, body: &str) -> Result<Vec<Category>> {
        let document = Document::parse(body);
        Ok(anchors(&document, "#allsort a")
            .into_iter()
            .filter(|(_, href)| href.contains("product"))
            .map(|(name, url)| Category { name, url })
            .collect())
    }
}
