//! Stage runner tests against a mock Dangdang site
//!
//! Dangdang listing pages keep the category's host, so a category seeded
//! with the mock server's URL leads the whole scrape back to the mock.

use mall_spider::config::{Config, DownloaderConfig, EnvironmentConfig, SpiderConfig};
use mall_spider::storage::{RunStatus, SqliteStorage, Storage};
use mall_spider::{Site, Spider, Stage};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENVIRONMENT: &str = "test";

/// Creates a test configuration writing to `db_path`
fn create_test_config(db_path: &Path, number: u32) -> Config {
    let mut environments = BTreeMap::new();
    environments.insert(
        ENVIRONMENT.to_string(),
        EnvironmentConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        },
    );

    Config {
        downloader: DownloaderConfig {
            concurrency: 4,
            timeout_secs: 5,
            user_agent: "mall-spider-test/0.1".to_string(),
        },
        spider: SpiderConfig { number },
        environments,
    }
}

/// An HTML response whose charset overrides the site's GB18030 default
fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html; charset=utf-8")
}

/// Seeds one root category and returns its URL
fn seed_category(db_path: &Path, url: &str) -> i64 {
    let mut storage = SqliteStorage::new(db_path).expect("Failed to open storage");
    storage
        .insert_or_get_category(Site::Dangdang, "图书", url)
        .expect("Failed to seed category")
}

fn listing_page(base_url: &str, products: &[u32]) -> String {
    let links: String = products
        .iter()
        .map(|id| {
            format!(
                r#"<li><div class="name"><a href="{}/product/{}.html">Book {}</a></div></li>"#,
                base_url, id, id
            )
        })
        .collect();
    format!(
        r#"<html><body><span id="all_num">共 2 页</span><ul class="mode_goods">{}</ul></body></html>"#,
        links
    )
}

fn product_page(base_url: &str, id: u32) -> String {
    format!(
        r#"<html><body>
        <div class="crumb">
            <a href="{base}/">当当网</a>
            <a href="{base}/list?cat=01">图书</a>
            <a href="{base}/list?cat=01.05">小说</a>
        </div>
        <div class="dp_wrap"><h1> Book {id} </h1></div>
        <span id="salePriceTag">¥{id}9.00</span>
        <img id="largePic" src="{base}/img/{id}.jpg">
        <p class="fraction"><img src="star_red.gif"><img src="star_red.gif"><img src="star_gray.gif"></p>
        <div id="comm_all">
            <div class="title"><h5><a>Good</a></h5><span class="time">2012-05-01 10:00:00</span><span class="star"><img src="star_red.gif"></span></div>
            <div class="text">Worth reading</div>
        </div>
        </body></html>"#,
        base = base_url,
        id = id
    )
}

#[tokio::test]
async fn test_full_scrape_dangdang() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for page in 1..=2u32 {
        let products: Vec<u32> = vec![page * 10 + 1, page * 10 + 2];
        Mock::given(method("GET"))
            .and(path("/list"))
            .and(query_param("cat", "01"))
            .and(query_param("p", page.to_string()))
            .respond_with(html(listing_page(&base_url, &products)))
            .mount(&mock_server)
            .await;
    }

    // The category itself, requested without a page number
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("cat", "01"))
        .respond_with(html(listing_page(&base_url, &[])))
        .mount(&mock_server)
        .await;

    for id in [11u32, 12, 21, 22] {
        Mock::given(method("GET"))
            .and(path(format!("/product/{}.html", id)))
            .respond_with(html(product_page(&base_url, id)))
            .mount(&mock_server)
            .await;
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("spider.db");
    let category_url = format!("{}/list?cat=01", base_url);
    let category_id = seed_category(&db_path, &category_url);

    let config = create_test_config(&db_path, 100);
    let mut spider =
        Spider::new(&config, "hash", ENVIRONMENT, Site::Dangdang).expect("Failed to create spider");

    // Paginate: one category, two pages
    let summary = spider.run(Stage::Paginate).await.expect("Paginate failed");
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.saved, 2);

    let counts = spider.storage().count_by_kind(Site::Dangdang).unwrap();
    assert_eq!(counts.pages, 2);
    assert_eq!(counts.categories_completed, 1);

    // Dig: two pages, four product links
    let summary = spider.run(Stage::Dig).await.expect("Dig failed");
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.saved, 4);

    let counts = spider.storage().count_by_kind(Site::Dangdang).unwrap();
    assert_eq!(counts.pages_completed, 2);
    assert_eq!(counts.product_urls, 4);

    // Parse: four products, breadcrumb adds one child category
    let summary = spider.run(Stage::Parse).await.expect("Parse failed");
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.failed, 0);

    let counts = spider.storage().count_by_kind(Site::Dangdang).unwrap();
    assert_eq!(counts.products, 4);
    assert_eq!(counts.product_urls_completed, 4);
    assert_eq!(counts.categories, 2);

    let categories = spider
        .storage()
        .pending_leaf_categories(Site::Dangdang, 10)
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "小说");
    assert_eq!(categories[0].parent_id, Some(category_id));

    // Every stage was recorded as a completed run
    let runs = spider.storage().latest_runs(10).unwrap();
    let stages: Vec<&str> = runs.iter().map(|run| run.stage.as_str()).collect();
    assert_eq!(stages, vec!["parse", "dig", "paginate"]);
    assert!(runs.iter().all(|run| run.status == RunStatus::Completed));
    assert!(runs.iter().all(|run| run.config_hash == "hash"));

    // Nothing left to do
    assert_eq!(spider.pending(Stage::Dig).unwrap(), 0);
    assert_eq!(spider.pending(Stage::Parse).unwrap(), 0);
}

#[tokio::test]
async fn test_truncated_page_stays_pending() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(html(
            r#"<html><body><span id="all_num">共 5 页</span>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("spider.db");
    seed_category(&db_path, &format!("{}/list?cat=02", base_url));

    let config = create_test_config(&db_path, 100);
    let mut spider = Spider::new(&config, "hash", ENVIRONMENT, Site::Dangdang).unwrap();

    let summary = spider.run(Stage::Paginate).await.unwrap();
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 1);

    let counts = spider.storage().count_by_kind(Site::Dangdang).unwrap();
    assert_eq!(counts.pages, 0);
    assert_eq!(counts.categories_completed, 0);
    assert_eq!(spider.pending(Stage::Paginate).unwrap(), 1);
}

#[tokio::test]
async fn test_http_error_leaves_product_pending() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(html(listing_page(&base_url, &[7, 8])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/7.html"))
        .respond_with(html(product_page(&base_url, 7)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/8.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("spider.db");
    seed_category(&db_path, &format!("{}/list?cat=03", base_url));

    // One page per batch keeps the dig stage to a single listing
    let config = create_test_config(&db_path, 1);
    let mut spider = Spider::new(&config, "hash", ENVIRONMENT, Site::Dangdang).unwrap();

    spider.run(Stage::Paginate).await.unwrap();
    spider.run(Stage::Dig).await.unwrap();

    let first = spider.run(Stage::Parse).await.unwrap();
    let second = spider.run(Stage::Parse).await.unwrap();
    assert_eq!(first.processed + second.processed, 1);

    let counts = spider.storage().count_by_kind(Site::Dangdang).unwrap();
    assert_eq!(counts.product_urls, 2);
    assert_eq!(counts.product_urls_completed, 1);
    assert_eq!(counts.products, 1);
    assert_eq!(spider.pending(Stage::Parse).unwrap(), 1);
}

#[tokio::test]
async fn test_fetch_stores_root_categories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Found/category.js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"var json_category={"01":{"n":"图书","u":"book#dd#list?cat=01"},"02":{"n":"首页","u":"www#dd#index.html"}};var menudataloaded=true;"#
                .as_bytes()
                .to_vec(),
            "application/javascript; charset=utf-8",
        ))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("spider.db");
    let config = create_test_config(&db_path, 100);
    let mut spider = Spider::new(&config, "hash", ENVIRONMENT, Site::Dangdang).unwrap();

    let source_url = format!("{}/Found/category.js", mock_server.uri());
    let summary = spider.fetch(&source_url).await.unwrap();
    assert_eq!(summary.saved, 1);

    let categories = spider
        .storage()
        .pending_leaf_categories(Site::Dangdang, 10)
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "图书");
    assert_eq!(categories[0].url, "http://book.dangdang.com/list?cat=01");

    // Fetching again does not duplicate categories
    spider.fetch(&source_url).await.unwrap();
    assert_eq!(spider.storage().count_by_kind(Site::Dangdang).unwrap().categories, 1);
}

#[tokio::test]
async fn test_unknown_environment() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir.path().join("spider.db"), 1);
    assert!(Spider::new(&config, "hash", "production", Site::Gome).is_err());
}
