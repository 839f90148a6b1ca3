//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_cartographer::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use site_cartographer::crawler::{run_crawl, Coordinator, CrawlReport};
use site_cartographer::output::{format_report, write_report, CrawlStatistics};
use site_cartographer::{ConfigError, CrawlError};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the given URL
fn create_test_config(root_url: String, max_tasks: u32, max_redirect: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            root_url,
            max_redirect,
            max_tasks,
            request_timeout: 5,
            connect_timeout: 2,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            report_dir: ".".to_string(),
        },
    }
}

/// HTML page; `set_body_raw` keeps the mime, `set_body_string` would force `text/plain`
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

fn redirect(status: u16, location: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("location", location)
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Runs a crawl, failing the test if it does not terminate
async fn crawl(config: &Config) -> CrawlReport {
    tokio::time::timeout(Duration::from_secs(30), run_crawl(config))
        .await
        .expect("crawl did not terminate")
        .expect("crawl failed to start")
}

fn outcome_urls(report: &CrawlReport) -> Vec<String> {
    report.outcomes.iter().map(|o| o.url.clone()).collect()
}

/// Three pages that link to each other
async fn three_page_site() -> MockServer {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html(r#"<html><body><a href="/a">A</a> <a href="/b">B</a></body></html>"#),
    )
    .await;
    mount(
        &server,
        "/a",
        html(r#"<html><body><a href="/">Home</a> <a href="/b#top">B</a></body></html>"#),
    )
    .await;
    mount(&server, "/b", html("<html><body>No links here</body></html>")).await;
    server
}

#[tokio::test]
async fn test_three_page_crawl_single_worker() {
    let server = three_page_site().await;
    let base = server.uri();

    let report = crawl(&create_test_config(format!("{}/", base), 1, 10)).await;

    assert!(!report.interrupted);
    assert_eq!(
        outcome_urls(&report),
        vec![format!("{}/", base), format!("{}/a", base), format!("{}/b", base)]
    );
    assert_eq!(report.sitemap.len(), 3);
    assert_eq!(report.urls_seen, 3);

    let root = &report.outcomes[0];
    assert_eq!(root.status, 200);
    assert_eq!(root.num_urls, 2);
    assert_eq!(root.num_new_urls, 2);
    assert_eq!(root.content_type.as_deref(), Some("text/html"));
    assert_eq!(root.encoding.as_deref(), Some("utf-8"));

    let page_a = &report.outcomes[1];
    assert_eq!(page_a.num_urls, 2);
    assert_eq!(page_a.num_new_urls, 0);
}

#[tokio::test]
async fn test_three_page_crawl_many_workers() {
    let server = three_page_site().await;
    let base = server.uri();

    let report = crawl(&create_test_config(format!("{}/", base), 10, 10)).await;

    // Each URL is fetched exactly once regardless of concurrency
    assert_eq!(report.outcomes.len(), 3);
    let new_links: usize = report.outcomes.iter().map(|o| o.num_new_urls).sum();
    assert_eq!(new_links, 2);
}

#[tokio::test]
async fn test_sitemap_records_links_and_assets() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(
        &server,
        "/",
        html(
            r#"<html><head>
                <link rel="stylesheet" href="/style.css">
                <script src="/app.js"></script>
            </head><body>
                <img src="/logo.png">
                <a href="/about">About</a>
                <a href="https://external.example.org/">External</a>
            </body></html>"#,
        ),
    )
    .await;
    mount(&server, "/about", html("<p>about</p>")).await;

    let report = crawl(&create_test_config(format!("{}/", base), 2, 10)).await;

    let entry = report.sitemap.get(&format!("{}/", base)).unwrap();
    assert_eq!(entry.assets.stylesheets, vec!["/style.css"]);
    assert_eq!(entry.assets.scripts, vec!["/app.js"]);
    assert_eq!(entry.assets.images, vec!["/logo.png"]);
    assert!(entry.links.contains(&format!("{}/about", base)));
    assert!(entry.links.contains("https://external.example.org/"));

    // Only the in-scope link counts and gets fetched
    assert_eq!(report.outcomes[0].num_urls, 1);
    assert_eq!(report.outcomes.len(), 2);
}

#[tokio::test]
async fn test_out_of_scope_links_not_fetched() {
    let server = MockServer::start().await;
    let port = server.address().port();
    mount(
        &server,
        "/",
        html(&format!(
            r#"<a href="http://localhost:{}/other-host">other</a>"#,
            port
        )),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/other-host"))
        .respond_with(html("never"))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(format!("{}/", server.uri()), 2, 10)).await;

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].num_urls, 0);
}

#[tokio::test]
async fn test_redirect_chain_within_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/r1", redirect(301, "/r2")).await;
    mount(&server, "/r2", redirect(302, "/r3")).await;
    mount(&server, "/r3", redirect(307, "/final")).await;
    mount(&server, "/final", html("<p>arrived</p>")).await;

    let report = crawl(&create_test_config(format!("{}/r1", base), 2, 3)).await;

    // Redirect hops are not outcomes; only the landing page is
    assert_eq!(outcome_urls(&report), vec![format!("{}/final", base)]);
    assert_eq!(report.urls_seen, 4);
}

#[tokio::test]
async fn test_redirect_chain_over_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/r1", redirect(301, "/r2")).await;
    mount(&server, "/r2", redirect(302, "/r3")).await;
    mount(&server, "/r3", redirect(303, "/final")).await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html("<p>arrived</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(format!("{}/r1", base), 2, 2)).await;

    assert!(report.outcomes.is_empty());
    assert!(report.sitemap.is_empty());
    assert_eq!(report.urls_seen, 3);
}

#[tokio::test]
async fn test_redirect_with_zero_budget_is_dropped() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", redirect(302, "/home")).await;
    mount(&server, "/home", html("<p>home</p>")).await;

    let report = crawl(&create_test_config(format!("{}/", base), 1, 0)).await;

    assert!(report.outcomes.is_empty());
}

#[tokio::test]
async fn test_redirect_loop_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/a", redirect(302, "/b")).await;
    mount(&server, "/b", redirect(302, "/a")).await;

    let report = crawl(&create_test_config(format!("{}/a", base), 4, 10)).await;

    assert!(report.outcomes.is_empty());
    assert_eq!(report.urls_seen, 2);
}

#[tokio::test]
async fn test_redirect_to_seen_page_is_not_refetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html(r#"<a href="/old">old</a>"#)).await;
    mount(&server, "/old", redirect(301, "/")).await;

    let report = crawl(&create_test_config(format!("{}/", base), 2, 10)).await;

    assert_eq!(outcome_urls(&report), vec![format!("{}/", base)]);
}

#[tokio::test]
async fn test_non_html_content_is_not_parsed() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(&server, "/", html(r#"<a href="/notes.txt">notes</a>"#)).await;
    mount(
        &server,
        "/notes.txt",
        ResponseTemplate::new(200)
            .set_body_raw(r#"<a href="/hidden">hidden</a>"#.as_bytes().to_vec(), "text/plain"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("never"))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(format!("{}/", base), 2, 10)).await;

    assert_eq!(report.outcomes.len(), 2);
    let notes = &report.outcomes[1];
    assert_eq!(notes.url, format!("{}/notes.txt", base));
    assert_eq!(notes.status, 200);
    assert_eq!(notes.num_urls, 0);
    assert_eq!(notes.content_type.as_deref(), Some("text/plain"));

    assert_eq!(report.sitemap.len(), 1);
    assert!(!report.sitemap.contains_key(&notes.url));
}

#[tokio::test]
async fn test_error_status_recorded_without_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    // /missing is not mounted, so the mock server answers 404
    mount(&server, "/", html(r#"<a href="/missing">missing</a>"#)).await;

    let report = crawl(&create_test_config(format!("{}/", base), 2, 10)).await;

    assert_eq!(report.outcomes.len(), 2);
    let missing = &report.outcomes[1];
    assert_eq!(missing.url, format!("{}/missing", base));
    assert_eq!(missing.status, 404);
    assert_eq!(missing.num_urls, 0);
    assert_eq!(missing.content_type, None);
    assert!(!report.sitemap.contains_key(&missing.url));
}

#[tokio::test]
async fn test_transport_failure_records_nothing() {
    let server = MockServer::start().await;
    let base = server.uri();
    // Same host, closed port: in scope but unreachable
    mount(&server, "/", html(r#"<a href="http://127.0.0.1:1/">dead</a>"#)).await;

    let report = crawl(&create_test_config(format!("{}/", base), 2, 10)).await;

    assert_eq!(outcome_urls(&report), vec![format!("{}/", base)]);
    assert_eq!(report.outcomes[0].num_new_urls, 1);
    assert_eq!(report.urls_seen, 2);
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("<p>hello</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(&create_test_config(format!("{}/", server.uri()), 1, 10)).await;

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].status, 200);
}

#[tokio::test]
async fn test_page_decoded_with_declared_charset() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_raw(
            b"<a href=\"/caf\xe9\">cafe</a>".to_vec(),
            "text/html; charset=ISO-8859-1",
        ),
    )
    .await;
    mount(&server, "/caf%C3%A9", html("<p>menu</p>")).await;

    let report = crawl(&create_test_config(format!("{}/", base), 2, 10)).await;

    assert_eq!(
        outcome_urls(&report),
        vec![format!("{}/", base), format!("{}/caf%C3%A9", base)]
    );
    assert_eq!(report.outcomes[0].encoding.as_deref(), Some("ISO-8859-1"));
    assert_eq!(report.outcomes[1].status, 200);
}

#[tokio::test]
async fn test_interrupt_returns_partial_report() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/",
        html("<p>slow</p>").set_delay(Duration::from_secs(10)),
    )
    .await;

    let coordinator =
        Coordinator::new(&create_test_config(format!("{}/", server.uri()), 2, 10)).unwrap();
    let shutdown = coordinator.shutdown_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown.cancel();
    });

    let report = tokio::time::timeout(Duration::from_secs(5), coordinator.run())
        .await
        .expect("interrupted crawl did not return");

    assert!(report.interrupted);
    assert!(report.outcomes.is_empty());
}

#[tokio::test]
async fn test_invalid_config_fails_before_crawling() {
    let mut config = create_test_config("ftp://example.com/".to_string(), 1, 10);
    let result: site_cartographer::Result<CrawlReport> = run_crawl(&config).await;
    assert!(matches!(
        result,
        Err(CrawlError::Config(ConfigError::InvalidUrl(_)))
    ));

    config.crawler.root_url = "http://example.com/".to_string();
    config.crawler.max_tasks = 0;
    assert!(matches!(
        run_crawl(&config).await,
        Err(CrawlError::Config(ConfigError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_report_and_statistics_end_to_end() {
    let server = three_page_site().await;
    let base = server.uri();
    let output_dir = TempDir::new().unwrap();

    let report = crawl(&create_test_config(format!("{}/", base), 3, 10)).await;

    let stats = CrawlStatistics::from_report(&report);
    assert_eq!(stats.total_pages, 3);
    assert_eq!(stats.pages_by_status.get(&200), Some(&3));
    assert_eq!(stats.sitemap_pages, 3);
    assert_eq!(stats.errors, 0);

    let path = write_report(&report, output_dir.path()).unwrap();
    let written = std::fs::read_to_string(path).unwrap();
    assert_eq!(written, format_report(&report));
    assert!(written.contains(&format!("1. {}/  200", base)));
    assert!(written.contains(&format!("Links on {}/a", base)));
}
