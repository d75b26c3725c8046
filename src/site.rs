//! Supported e-commerce sites
//!
//! [`Site`] is the dispatch point from a site name (as stored in the `kind`
//! column and given on the command line) to that site's paginater, digger,
//! parser and category fetcher.

use crate::digger::{
    DangdangDigger, Digger, GomeDigger, JingdongDigger, NeweggDigger, SuningDigger, TmallDigger,
};
use crate::fetcher::{
    DangdangFetcher, Fetcher, GomeFetcher, JingdongFetcher, NeweggFetcher, SuningFetcher,
    TmallFetcher,
};
use crate::paginater::{
    DangdangPaginater, GomePaginater, JingdongPaginater, NeweggPaginater, Paginater,
    SuningPaginater, TmallPaginater,
};
use crate::parser::{
    DangdangParser, GomeParser, JingdongParser, NeweggParser, Parser, SuningParser, TmallParser,
};
use crate::SpiderError;
use std::fmt;
use std::str::FromStr;

/// An e-commerce site with its own page layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Dangdang,
    Jingdong,
    Tmall,
    Newegg,
    Suning,
    Gome,
}

impl Site {
    /// Every supported site
    pub const ALL: [Site; 6] = [
        Site::Dangdang,
        Site::Jingdong,
        Site::Tmall,
        Site::Newegg,
        Site::Suning,
        Site::Gome,
    ];

    /// The lowercase tag stored as `kind`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dangdang => "dangdang",
            Self::Jingdong => "jingdong",
            Self::Tmall => "tmall",
            Self::Newegg => "newegg",
            Self::Suning => "suning",
            Self::Gome => "gome",
        }
    }

    /// Charset the site serves its pages in when the response does not say
    pub fn encoding(&self) -> &'static str {
        match self {
            Self::Dangdang | Self::Jingdong | Self::Newegg | Self::Tmall => "gb18030",
            Self::Suning | Self::Gome => "utf-8",
        }
    }

    pub fn paginater(&self) -> Box<dyn Paginater> {
        match self {
            Self::Dangdang => Box::new(DangdangPaginater),
            Self::Jingdong => Box::new(JingdongPaginater),
            Self::Tmall => Box::new(TmallPaginater),
            Self::Newegg => Box::new(NeweggPaginater),
            Self::Suning => Box::new(SuningPaginater),
            Self::Gome => Box::new(GomePaginater),
        }
    }

    pub fn digger(&self) -> Box<dyn Digger> {
        match self {
            Self::Dangdang => Box::new(DangdangDigger),
            Self::Jingdong => Box::new(JingdongDigger),
            Self::Tmall => Box::new(TmallDigger),
            Self::Newegg => Box::new(NeweggDigger),
            Self::Suning => Box::new(SuningDigger),
            Self::Gome => Box::new(GomeDigger),
        }
    }

    pub fn parser(&self) -> Box<dyn Parser> {
        match self {
            Self::Dangdang => Box::new(DangdangParser),
            Self::Jingdong => Box::new(JingdongParser),
            Self::Tmall => Box::new(TmallParser),
            Self::Newegg => Box::new(NeweggParser),
            Self::Suning => Box::new(SuningParser),
            Self::Gome => Box::new(GomeParser),
        }
    }

    pub fn fetcher(&self) -> Box<dyn Fetcher> {
        match self {
            Self::Dangdang => Box::new(DangdangFetcher),
            Self::Jingdong => Box::new(JingdongFetcher),
            Self::Tmall => Box::new(TmallFetcher),
            Self::Newegg => Box::new(NeweggFetcher),
            Self::Suning => Box::new(SuningFetcher),
            Self::Gome => Box::new(GomeFetcher),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = SpiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Site::ALL
            .into_iter()
            .find(|site| site.as_str() == lower)
            .ok_or_else(|| SpiderError::UnknownSite(s.to_string()))
    }
}
