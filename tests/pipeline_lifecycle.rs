//! Integration tests for the full pipeline against a mock community site.
//!
//! Each test runs its own wiremock server and temp directory. The first run
//! discovers and enriches over HTTP; later runs must be served from the cache.

use std::path::Path;

use feedfinder::error::AppError;
use feedfinder::models::{Config, FailurePolicy, FeedRecord};
use feedfinder::pipeline::{RunOptions, run_pipeline};
use feedfinder::storage::{JsonFileCache, RecordStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOT_PATH: &str = "/t5/custom/page/page-id/Blogs";

const ROOT_PAGE: &str = r#"<html><body>
<ul class="blogs-all-list">
  <li><a href="/t5/azure/bg-p/AzureBlog">Azure Blog</a></li>
  <li><a href="/t5/security/bg-p/SecurityBlog">Security Blog</a></li>
  <li><a href="/t5/ai/bg-p/AIBlog">AI Blog</a></li>
  <li><span>No link here</span></li>
</ul>
</body></html>"#;

const README_TEMPLATE: &str = "# {title}\n\nUpdated {generated}.\n\n\
{blog_count} blogs in {category_count} categories.\n\n{categories}\n";

fn blog_page(board: &str, category: &str) -> String {
    format!(
        r#"<html><head>
<link rel="alternate" type="application/rss+xml" href="/gxcuf89792/rss/board?board.id={board}"></link>
</head><body><a class="crumb-category" href="/t5/c/ct-p/c">{category}</a></body></html>"#
    )
}

async fn mount_page(server: &MockServer, page: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount a page without a request count expectation.
async fn mount_any(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// A site expecting exactly one request per page.
async fn community_site() -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, ROOT_PAGE.to_string(), 1).await;
    mount_page(
        &server,
        "/t5/azure/bg-p/AzureBlog",
        blog_page("AzureBlog", "Azure"),
        1,
    )
    .await;
    mount_page(
        &server,
        "/t5/security/bg-p/SecurityBlog",
        blog_page("SecurityBlog", "Security"),
        1,
    )
    .await;
    mount_page(&server, "/t5/ai/bg-p/AIBlog", blog_page("AIBlog", "AI"), 1).await;
    server
}

fn config_for(server: &MockServer, dir: &Path) -> Config {
    let mut config = Config::default();
    config.discovery.root_url = format!("{}{}", server.uri(), ROOT_PATH);
    config.paths.cache_file = dir.join("bloglistcache.json");
    config.paths.opml_file = dir.join("technetblogs.opml");
    config.paths.readme_template = dir.join("README.template.md");
    config.paths.readme_file = dir.join("output").join("README.md");
    std::fs::write(&config.paths.readme_template, README_TEMPLATE).unwrap();
    config
}

#[tokio::test]
async fn test_first_run_writes_cache_opml_and_readme() {
    let server = community_site().await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, tmp.path());

    let summary = run_pipeline(&config, RunOptions::default()).await.unwrap();
    assert_eq!(summary.records, 3);
    assert_eq!(summary.categories, 3);
    assert!(!summary.from_cache);

    let cached = JsonFileCache::new(&config.paths.cache_file)
        .load()
        .await
        .unwrap();
    let names: Vec<&str> = cached.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Azure Blog", "Security Blog", "AI Blog"]);
    assert_eq!(
        cached[0].feed_url,
        format!(
            "{}/gxcuf89792/rss/board?board.id=AzureBlog",
            server.uri()
        )
    );

    let opml = std::fs::read_to_string(&config.paths.opml_file).unwrap();
    assert!(opml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(opml.contains("<title>Microsoft Tech Community Blogs</title>"));
    assert!(opml.contains(r#"<outline text="Microsoft Technical Community Blogs">"#));
    let ai = opml.find(r#"<outline text="AI">"#).unwrap();
    let azure = opml.find(r#"<outline text="Azure">"#).unwrap();
    let security = opml.find(r#"<outline text="Security">"#).unwrap();
    assert!(ai < azure && azure < security);

    let readme = std::fs::read_to_string(&config.paths.readme_file).unwrap();
    assert!(readme.contains("3 blogs in 3 categories."));
    assert!(readme.contains("## AI"));
    assert!(readme.contains(&format!("- [AI Blog]({}/t5/ai/bg-p/AIBlog)", server.uri())));
}

#[tokio::test]
async fn test_second_run_uses_cache() {
    let server = community_site().await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, tmp.path());

    let first = run_pipeline(&config, RunOptions::default()).await.unwrap();
    let first_cache = std::fs::read_to_string(&config.paths.cache_file).unwrap();
    std::fs::remove_file(&config.paths.opml_file).unwrap();

    let second = run_pipeline(&config, RunOptions::default()).await.unwrap();
    assert!(second.from_cache);
    assert_eq!(second.records, first.records);
    assert_eq!(
        std::fs::read_to_string(&config.paths.cache_file).unwrap(),
        first_cache
    );
    assert!(config.paths.opml_file.exists());
    // Each page mock expects exactly one request; verified when `server` drops.
}

#[tokio::test]
async fn test_cached_records_are_not_re_enriched() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, tmp.path());

    let cached = vec![
        FeedRecord {
            name: "Hand Edited".to_string(),
            url: "https://example.com/t5/edited".to_string(),
            feed_url: "https://example.com/feed".to_string(),
            category: "Custom".to_string(),
        },
        FeedRecord::new("Never Enriched", "https://example.com/t5/raw"),
    ];
    JsonFileCache::new(&config.paths.cache_file)
        .save(&cached)
        .await
        .unwrap();

    let summary = run_pipeline(&config, RunOptions::default()).await.unwrap();
    assert!(summary.from_cache);
    assert_eq!(summary.categories, 2);

    let opml = std::fs::read_to_string(&config.paths.opml_file).unwrap();
    assert!(opml.contains(r#"xmlUrl="https://example.com/feed""#));
    assert!(opml.contains(r#"<outline text="">"#));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_feed_aborts_without_outputs() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, ROOT_PAGE.to_string(), 1).await;
    mount_any(&server, "/t5/azure/bg-p/AzureBlog", blog_page("AzureBlog", "Azure")).await;
    mount_any(
        &server,
        "/t5/security/bg-p/SecurityBlog",
        "<html><body>no feed</body></html>".to_string(),
    )
    .await;
    mount_any(&server, "/t5/ai/bg-p/AIBlog", blog_page("AIBlog", "AI")).await;

    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, tmp.path());

    let err = run_pipeline(&config, RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FeedNotFound { .. }));
    assert!(!config.paths.cache_file.exists());
    assert!(!config.paths.opml_file.exists());
}

#[tokio::test]
async fn test_skip_policy_writes_blog_without_feed() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, ROOT_PAGE.to_string(), 1).await;
    mount_page(
        &server,
        "/t5/azure/bg-p/AzureBlog",
        blog_page("AzureBlog", "Azure"),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/t5/security/bg-p/SecurityBlog"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/t5/ai/bg-p/AIBlog", blog_page("AIBlog", "AI"), 1).await;

    let tmp = TempDir::new().unwrap();
    let mut config = config_for(&server, tmp.path());
    config.enrichment.on_failure = FailurePolicy::Skip;

    let summary = run_pipeline(&config, RunOptions::default()).await.unwrap();
    assert_eq!(summary.records, 3);
    assert_eq!(summary.failures, 1);

    let cached = JsonFileCache::new(&config.paths.cache_file)
        .load()
        .await
        .unwrap();
    assert_eq!(cached[1].name, "Security Blog");
    assert!(!cached[1].is_enriched());

    let readme = std::fs::read_to_string(&config.paths.readme_file).unwrap();
    assert!(readme.contains("## Uncategorized"));
}

#[tokio::test]
async fn test_refresh_refetches_everything() {
    let server = MockServer::start().await;
    mount_page(&server, ROOT_PATH, ROOT_PAGE.to_string(), 2).await;
    mount_page(
        &server,
        "/t5/azure/bg-p/AzureBlog",
        blog_page("AzureBlog", "Azure"),
        2,
    )
    .await;
    mount_page(
        &server,
        "/t5/security/bg-p/SecurityBlog",
        blog_page("SecurityBlog", "Security"),
        2,
    )
    .await;
    mount_page(&server, "/t5/ai/bg-p/AIBlog", blog_page("AIBlog", "AI"), 2).await;

    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, tmp.path());

    run_pipeline(&config, RunOptions::default()).await.unwrap();
    let refreshed = run_pipeline(&config, RunOptions { refresh: true })
        .await
        .unwrap();
    assert!(!refreshed.from_cache);
    assert_eq!(refreshed.records, 3);
}
