//! Configuration loading tests against files on disk

use mall_spider::config::{load_config, load_config_with_hash, DEFAULT_ENVIRONMENT};
use mall_spider::{ConfigError, Site, Spider, Stage};
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

fn example_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.example.toml")
}

#[test]
fn test_example_config_loads() {
    let config = load_config(&example_config_path()).expect("Example config should load");

    assert_eq!(config.downloader.concurrency, 10);
    assert_eq!(config.downloader.timeout_secs, 30);
    assert_eq!(config.spider.number, 1000);
    assert_eq!(
        config.environment(DEFAULT_ENVIRONMENT).unwrap().database_path,
        "./spider_development.db"
    );
    assert!(config.environment("production").is_ok());
}

#[test]
fn test_unknown_environment_is_reported() {
    let config = load_config(&example_config_path()).unwrap();
    assert!(matches!(
        config.environment("staging"),
        Err(ConfigError::UnknownEnvironment(name)) if name == "staging"
    ));
}

#[test]
fn test_hash_changes_with_content() {
    let (_, example_hash) = load_config_with_hash(&example_config_path()).unwrap();

    let mut file = NamedTempFile::new().unwrap();
    let mut content = std::fs::read_to_string(example_config_path()).unwrap();
    content = content.replace("number = 1000", "number = 50");
    file.write_all(content.as_bytes()).unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    assert_eq!(config.spider.number, 50);
    assert_eq!(hash.len(), 64);
    assert_ne!(hash, example_hash);
}

#[test]
fn test_spider_from_loaded_config() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("spider.db");

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[downloader]
concurrency = 2
timeout-secs = 5
user-agent = "mall-spider-test/0.1"

[spider]
number = 3

[environments.test]
database-path = "{}"
"#,
        db_path.display()
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    let spider = Spider::new(&config, &hash, "test", Site::Suning).unwrap();

    assert_eq!(spider.site(), Site::Suning);
    assert_eq!(spider.pending(Stage::Paginate).unwrap(), 0);
    assert!(db_path.exists());
}
