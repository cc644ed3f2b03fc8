//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end over real HTTP. The crawl itself is blocking, so it
//! runs on tokio's blocking pool while the mock servers keep serving.

use tidewalk::config::{Config, UserAgentConfig};
use tidewalk::state::OutcomeKind;
use tidewalk::{CrawlEngine, CrawlReport, ScopeMode};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short poll interval
fn create_test_config(workers: usize, scope: ScopeMode) -> Config {
    let mut config = Config::default();
    config.crawler.workers = workers;
    config.crawler.poll_interval_ms = 50;
    config.crawler.scope = scope;
    config.http.connect_timeout_secs = 2;
    config.http.request_timeout_secs = 5;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    };
    config
}

/// Runs a blocking crawl off the async runtime
async fn crawl(config: Config, seed: String) -> CrawlReport {
    tokio::task::spawn_blocking(move || CrawlEngine::from_config(&config).run(&seed))
        .await
        .expect("Crawl task panicked")
        .expect("Crawl failed")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_crawl_single_domain() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html(
            r##"<a href="/b">B</a>
                <a href="c">C</a>
                <a href="/missing">Gone</a>
                <a href="/data.json">Data</a>
                <a href="https://other.example/x">Elsewhere</a>
                <a href="mailto:someone@example.com">Mail</a>
                <a href="#top">Top</a>"##,
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/b",
        html(&format!(
            r#"<a href="{}/c">C again</a><a href="/">Home</a>"#,
            base_url
        )),
    )
    .await;

    mount_page(&mock_server, "/c", html("<p>Leaf</p>")).await;

    mount_page(
        &mock_server,
        "/data.json",
        ResponseTemplate::new(200)
            .set_body_string(r#"{"href": "/hidden"}"#)
            .insert_header("content-type", "application/json"),
    )
    .await;

    mount_page(&mock_server, "/missing", ResponseTemplate::new(404)).await;

    let report = crawl(
        create_test_config(4, ScopeMode::Prefix),
        format!("{}/", base_url),
    )
    .await;

    let mut expected: Vec<String> = ["/", "/b", "/c", "/data.json", "/missing"]
        .iter()
        .map(|p| format!("{}{}", base_url, p))
        .collect();
    expected.sort();

    assert_eq!(report.visited, expected);
    assert_eq!(report.unique_pages(), 5);
    assert_eq!(report.stop_requests, 1);
    assert_eq!(report.workers_started, 4);

    let stats = &report.statistics;
    assert_eq!(stats.total_pages, 5);
    assert_eq!(stats.count(OutcomeKind::Processed), 3);
    assert_eq!(stats.count(OutcomeKind::HttpError), 1);
    assert_eq!(stats.count(OutcomeKind::NotHtml), 1);
    assert_eq!(stats.error_statuses.get(&404), Some(&1));

    // Each mounted page must have been requested exactly once
    mock_server.verify().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_strict_scope_ignores_other_port() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        html(&format!(
            r#"<a href="{}/foreign">Foreign</a><a href="/local">Local</a>"#,
            other_server.uri()
        )),
    )
    .await;
    mount_page(&mock_server, "/local", html("")).await;

    Mock::given(method("GET"))
        .respond_with(html(""))
        .expect(0)
        .mount(&other_server)
        .await;

    let report = crawl(
        create_test_config(2, ScopeMode::Host),
        format!("{}/", mock_server.uri()),
    )
    .await;

    assert_eq!(report.unique_pages(), 2);
    assert!(report
        .visited
        .iter()
        .all(|url| url.starts_with(&mock_server.uri())));

    mock_server.verify().await;
    other_server.verify().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact)",
        ))
        .respond_with(html("<p>hello</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawl(
        create_test_config(1, ScopeMode::Prefix),
        format!("{}/", mock_server.uri()),
    )
    .await;

    assert_eq!(report.statistics.count(OutcomeKind::Processed), 1);
    mock_server.verify().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirect_followed() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", html(r#"<a href="/old">Old</a>"#)).await;
    mount_page(
        &mock_server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/new"),
    )
    .await;
    mount_page(&mock_server, "/new", html(r#"<a href="/leaf">Leaf</a>"#)).await;
    mount_page(&mock_server, "/leaf", html("")).await;

    let report = crawl(
        create_test_config(2, ScopeMode::Prefix),
        format!("{}/", mock_server.uri()),
    )
    .await;

    // The redirect target is fetched but only the requested URL is recorded
    let base_url = mock_server.uri();
    assert_eq!(
        report.visited,
        vec![
            format!("{}/", base_url),
            format!("{}/leaf", base_url),
            format!("{}/old", base_url),
        ]
    );
    assert_eq!(report.statistics.count(OutcomeKind::Processed), 3);

    mock_server.verify().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_seed_not_found() {
    let mock_server = MockServer::start().await;

    let report = crawl(
        create_test_config(3, ScopeMode::Prefix),
        format!("{}/", mock_server.uri()),
    )
    .await;

    assert_eq!(report.unique_pages(), 1);
    assert_eq!(report.statistics.count(OutcomeKind::HttpError), 1);
    assert_eq!(report.stop_requests, 1);
}
