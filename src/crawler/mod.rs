//! Crawler module for stage-by-stage scraping
//!
//! A scrape of one site runs as four resumable stages, each reading the
//! previous stage's uncompleted records from storage:
//!
//! | Stage      | Reads               | Writes                          |
//! |------------|---------------------|---------------------------------|
//! | `fetch`    | the site's category source | root categories          |
//! | `paginate` | leaf categories     | listing pages                   |
//! | `dig`      | listing pages       | product URLs                    |
//! | `parse`    | product URLs        | products, breadcrumb categories |

mod downloader;
mod spider;

pub use downloader::{build_http_client, valid_html, Downloadable, Downloader};
pub use spider::{Spider, StageSummary};

use crate::SpiderError;
use std::fmt;
use std::str::FromStr;

/// One step of the scrape pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Paginate,
    Dig,
    Parse,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Fetch, Stage::Paginate, Stage::Dig, Stage::Parse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Paginate => "paginate",
            Self::Dig => "dig",
            Self::Parse => "parse",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = SpiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == lower)
            .ok_or_else(|| SpiderError::UnknownStage(s.to_string()))
    }
}
