//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from the seed request to the files
//! left in the output directory.

use golly::config::{resolve_config, CrawlConfig, CrawlOptions};
use golly::crawler::crawl;
use golly::{ConfigError, GollyError};
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `server` into `output`
fn create_test_config(server: &MockServer, output: &Path, depth: u32) -> CrawlConfig {
    resolve_config(CrawlOptions {
        url: Some(format!("{}/", server.uri())),
        output: Some(output.to_path_buf()),
        depth: Some(depth),
        parallel: Some(4),
        timeout: Some("5s".to_string()),
        ..Default::default()
    })
    .expect("valid test configuration")
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name))
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e))
}

/// Markdown files in the output directory, index excluded
fn saved_pages(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "index.md")
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<h1>Welcome</h1>
            <p>Start <a href="/page1">here</a> or <a href="page2">there</a>.</p>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        html_page("Page One", r#"<p>One. Back <a href="/">home</a>.</p>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        html_page("Page Two", r#"<p>Two. See <a href="/page1#intro">one</a>.</p>"#),
        1,
    )
    .await;

    let config = create_test_config(&mock_server, output.path(), 3);
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.pipeline.pages_saved(), 3);
    assert_eq!(report.stats.pages_fetched, 3);
    assert_eq!(report.stats.fetch_failures, 0);
    assert_eq!(report.urls_visited, 3);

    assert_eq!(
        saved_pages(output.path()),
        vec!["Home.md", "Page One.md", "Page Two.md"]
    );

    let home = read(output.path(), "Home.md");
    let expected_header = format!(
        "---\ntitle: \"Home\"\nsource_url: \"{}/\"\ndate_scraped: \"",
        mock_server.uri()
    );
    assert!(home.starts_with(&expected_header), "unexpected header: {}", home);
    assert!(home.contains("Welcome"));

    let index = read(output.path(), "index.md");
    assert!(index.starts_with("# Index of Scraped Pages\n\n"));
    assert!(index.contains(&format!(
        "- [Home](Home.md) - [Source]({}/)\n",
        mock_server.uri()
    )));
    assert!(index.contains(&format!(
        "- [Page One](Page%20One.md) - [Source]({}/page1)\n",
        mock_server.uri()
    )));
    assert_eq!(index.lines().filter(|l| l.starts_with("- [")).count(), 3);
}

#[tokio::test]
async fn test_relative_links_saved_as_absolute() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Start", r#"<p><a href="/a/b">B</a></p>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/a/b",
        html_page("B", r#"<p>Read <a href="/docs/x">the docs</a>.</p>"#),
        1,
    )
    .await;

    let config = create_test_config(&mock_server, output.path(), 1);
    crawl(config, CancellationToken::new()).await.unwrap();

    let page = read(output.path(), "B.md");
    assert!(page.contains(&format!("{}/docs/x", mock_server.uri())));
    assert!(!page.contains("](/docs/x)"));
}

#[tokio::test]
async fn test_colliding_titles_get_suffixes() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", r#"<a href="/one">1</a> <a href="/two">2</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/one", html_page("Overview", "<p>first</p>"), 1).await;
    mount_page(&mock_server, "/two", html_page("Overview", "<p>second</p>"), 1).await;

    let config = create_test_config(&mock_server, output.path(), 2);
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.pipeline.pages_saved(), 3);
    assert_eq!(
        saved_pages(output.path()),
        vec!["Home.md", "Overview.md", "Overview_1.md"]
    );

    let bodies = read(output.path(), "Overview.md") + &read(output.path(), "Overview_1.md");
    assert!(bodies.contains("first"));
    assert!(bodies.contains("second"));

    let index = read(output.path(), "index.md");
    assert!(index.contains("(Overview_1.md)"));
}

#[tokio::test]
async fn test_single_slot_queue_saves_every_page() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/doc{}">{}</a> "#, i, i))
        .collect();
    mount_page(&mock_server, "/", html_page("Home", &links), 1).await;
    for i in 0..8 {
        mount_page(
            &mock_server,
            &format!("/doc{}", i),
            html_page(&format!("Doc {}", i), "<p>body</p>"),
            1,
        )
        .await;
    }

    let mut config = create_test_config(&mock_server, output.path(), 2);
    config.queue_capacity = 1;
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.stats.records_queued, 9);
    assert_eq!(report.stats.records_dropped, 0);
    assert_eq!(report.pipeline.pages_saved(), 9);
    assert_eq!(saved_pages(output.path()).len(), 9);
}

#[tokio::test]
async fn test_non_html_and_failures_are_skipped() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<a href="/data.json">data</a> <a href="/gone">gone</a> <a href="/ok">ok</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/data.json",
        ResponseTemplate::new(200)
            .set_body_string(r#"{"a": 1}"#)
            .insert_header("content-type", "application/json"),
        1,
    )
    .await;
    mount_page(&mock_server, "/gone", ResponseTemplate::new(404), 1).await;
    mount_page(&mock_server, "/ok", html_page("Ok", "<p>fine</p>"), 1).await;

    let config = create_test_config(&mock_server, output.path(), 3);
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.stats.non_html_skipped, 1);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.pipeline.pages_saved(), 2);
    assert_eq!(saved_pages(output.path()), vec!["Home.md", "Ok.md"]);
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Root", r#"<a href="/level1">1</a>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/level1",
        html_page("Level 1", r#"<a href="/level2">2</a>"#),
        1,
    )
    .await;
    mount_page(&mock_server, "/level2", html_page("Level 2", "<p>deep</p>"), 0).await;

    let config = create_test_config(&mock_server, output.path(), 1);
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(saved_pages(output.path()), vec!["Level 1.md", "Root.md"]);
}

#[tokio::test]
async fn test_other_hosts_not_crawled() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // Same machine, different host name: excluded by the default pattern
    let other_port = other_server.address().port();
    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            &format!(r#"<a href="http://localhost:{}/elsewhere">away</a>"#, other_port),
        ),
        1,
    )
    .await;
    mount_page(&other_server, "/elsewhere", html_page("Away", "<p>x</p>"), 0).await;

    let config = create_test_config(&mock_server, output.path(), 3);
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(saved_pages(output.path()), vec!["Home.md"]);
}

#[tokio::test]
async fn test_seed_not_refetched_via_backlinks() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", r#"<a href="/child">child</a>"#),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/child",
        html_page("Child", r#"<a href="/">home</a> <a href="/#top">top</a>"#),
        1,
    )
    .await;

    let config = create_test_config(&mock_server, output.path(), 0);
    let report = crawl(config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_cancelled_crawl_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html_page("Home", "<p>x</p>"), 0).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let config = create_test_config(&mock_server, output.path(), 3);
    let report = crawl(config, cancel).await.unwrap();

    assert_eq!(report.stats.cancelled, 1);
    assert_eq!(report.pipeline.pages_saved(), 0);
    assert_eq!(read(output.path(), "index.md"), "# Index of Scraped Pages\n\n");
}

#[tokio::test]
async fn test_unwritable_output_dir_is_fatal() {
    let mock_server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();
    let blocker = scratch.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();

    mount_page(&mock_server, "/", html_page("Home", "<p>x</p>"), 0).await;

    let config = create_test_config(&mock_server, &blocker.join("out"), 3);
    let result = crawl(config, CancellationToken::new()).await;

    assert!(matches!(result, Err(GollyError::OutputDir { .. })));
}

#[test]
fn test_invalid_include_pattern_rejected() {
    let result = resolve_config(CrawlOptions {
        url: Some("https://example.com/".to_string()),
        include: Some("([bad".to_string()),
        ..Default::default()
    });

    assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
}
