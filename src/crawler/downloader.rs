//! HTTP downloader
//!
//! This module handles all HTTP requests for the spider:
//! - Building the HTTP client from the configured user agent and timeout
//! - Decoding bodies from the site's charset
//! - Rejecting truncated HTML documents
//! - Running a batch of downloads with bounded concurrency

use crate::config::DownloaderConfig;
use crate::site::Site;
use crate::storage::{CategoryRecord, PageRecord, ProductUrlRecord};
use crate::{Result, SpiderError};
use futures::stream::{self, Stream, StreamExt};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;

/// A document is complete when `</html>` is followed only by whitespace and comments
static HTML_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)</html>(?:\s|<!--.*?-->)*\z").expect("valid html end regex")
});

/// Something with a URL to download
pub trait Downloadable {
    fn url(&self) -> &str;
}

impl Downloadable for CategoryRecord {
    fn url(&self) -> &str {
        &self.url
    }
}

impl Downloadable for PageRecord {
    fn url(&self) -> &str {
        &self.url
    }
}

impl Downloadable for ProductUrlRecord {
    fn url(&self) -> &str {
        &self.url
    }
}

/// Builds an HTTP client with the configured identity and timeout
///
/// # Arguments
///
/// * `config` - The downloader configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use mall_spider::config::DownloaderConfig;
/// use mall_spider::crawler::build_http_client;
///
/// let config = DownloaderConfig {
///     concurrency: 10,
///     timeout_secs: 30,
///     user_agent: "mall-spider/0.1".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &DownloaderConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if `body` ends with a closing `</html>` tag
///
/// Servers under load sometimes cut responses short; such pages would
/// parse into a partial tree and silently lose products.
pub fn valid_html(body: &str) -> bool {
    HTML_END.is_match(body)
}

/// Downloads pages of one site
pub struct Downloader {
    client: Client,
    site: Site,
    concurrency: usize,
}

impl Downloader {
    /// Creates a downloader for `site`
    pub fn new(config: &DownloaderConfig, site: Site) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            site,
            concurrency: usize::try_from(config.concurrency).unwrap_or(1).max(1),
        })
    }

    /// Downloads `url` and decodes it with the site's charset
    ///
    /// A charset declared in the response's `Content-Type` wins over the
    /// site default. Undecodable bytes become `?`.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The decoded body
    /// * `Err(SpiderError::Http)` - The request failed
    /// * `Err(SpiderError::Status)` - The server answered with a non-2xx status
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let http_error = |source| SpiderError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpiderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text_with_charset(self.site.encoding())
            .await
            .map_err(http_error)?;

        Ok(body.replace('\u{FFFD}', "?"))
    }

    /// Downloads `url` and checks that the body is a complete HTML document
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The decoded document
    /// * `Err(SpiderError::BadHtml)` - The document is truncated
    /// * `Err(SpiderError)` - Any error of [`Downloader::fetch_text`]
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let body = self.fetch_text(url).await?;
        if !valid_html(&body) {
            return Err(SpiderError::BadHtml {
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    /// Downloads every item, yielding each with its result as it completes
    ///
    /// At most `concurrency` requests are in flight. Results arrive in
    /// completion order, not input order.
    pub fn download_all<'a, T>(
        &'a self,
        items: Vec<T>,
    ) -> impl Stream<Item = (T, Result<String>)> + 'a
    where
        T: Downloadable + 'a,
    {
        stream::iter(items)
            .map(move |item| async move {
                let result = self.fetch_html(item.url()).await;
                (item, result)
            })
            .buffer_unordered(self.concurrency)
    }
}
