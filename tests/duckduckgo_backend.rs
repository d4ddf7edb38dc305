mod common;

use common::{as_refs, results_page, rows, BodyLacks, HeaderIs};
use ddg_search::engines::{DuckDuckGo, SafeSearch, SearchSession, TextOptions, TextSearch};
use ddg_search::{search, Settings};
use futures::TryStreamExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> DuckDuckGo {
    DuckDuckGo::new().with_html_url(format!("{}/html/", server.uri()))
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_first_page_request_and_results() {
    let server = MockServer::start().await;
    let page = rows(1, 3);

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("q=rust"))
        .and(body_string_contains("kl=wt-wt"))
        .and(body_string_contains("kp=-1"))
        .and(HeaderIs("Accept-Language", "en-US,en;q=0.9"))
        .respond_with(html(results_page(&as_refs(&page), None)))
        .expect(1)
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 20).await;

    assert!(response.is_success(), "{:?}", response.error());
    assert_eq!(response.count(), Some(3));
    let titles: Vec<_> = response.results().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Result 1", "Result 2", "Result 3"]);
    assert_eq!(response.results()[0].url, "https://example.com/1");
    assert_eq!(response.results()[0].description, "Snippet 1");
    assert_eq!(response.results()[0].source, "duckduckgo");
}

#[tokio::test]
async fn test_pagination_follows_next_form() {
    let server = MockServer::start().await;
    let first = rows(1, 10);
    let second = rows(11, 10);

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(BodyLacks("s=10"))
        .respond_with(html(results_page(&as_refs(&first), Some(10))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("s=10"))
        .and(body_string_contains("vqd=4-fixture"))
        .respond_with(html(results_page(&as_refs(&second), None)))
        .expect(1)
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 15).await;

    assert_eq!(response.count(), Some(15));
    assert_eq!(response.results()[14].url, "https://example.com/15");
}

#[tokio::test]
async fn test_cap_reached_on_first_page_skips_next_page() {
    let server = MockServer::start().await;
    let first = rows(1, 10);

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(BodyLacks("s=10"))
        .respond_with(html(results_page(&as_refs(&first), Some(10))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("s=10"))
        .respond_with(html(results_page(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 4).await;

    assert_eq!(response.count(), Some(4));
}

#[tokio::test]
async fn test_without_cap_only_first_page_is_used() {
    let server = MockServer::start().await;
    let first = rows(1, 10);

    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(html(results_page(&as_refs(&first), Some(10))))
        .expect(1)
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 0).await;

    assert_eq!(response.count(), Some(10));
}

#[tokio::test]
async fn test_duplicate_links_are_dropped() {
    let server = MockServer::start().await;
    let page = [
        ("First", "https://example.com/same", "one"),
        ("Second", "https://example.com/same", "two"),
        ("Third", "https://example.com/other", "three"),
    ];

    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(html(results_page(&page, None)))
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 20).await;

    let titles: Vec<_> = response.results().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Third"]);
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 20).await;

    assert!(!response.is_success());
    assert!(response.results().is_empty());
    let error = response.error().unwrap();
    assert!(error.contains("Ratelimit"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_http_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 20).await;

    assert_eq!(response.query(), "rust");
    assert!(response.error().unwrap().contains("503"));
}

#[tokio::test]
async fn test_second_page_failure_discards_first_page() {
    let server = MockServer::start().await;
    let first = rows(1, 10);

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(BodyLacks("s=10"))
        .respond_with(html(results_page(&as_refs(&first), Some(10))))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("s=10"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = search(&backend(&server), "rust", 20).await;

    assert!(!response.is_success());
    assert!(response.results().is_empty());
    assert!(response.error().unwrap().contains("500"));
}

#[tokio::test]
async fn test_filters_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .and(body_string_contains("kl=de-de"))
        .and(body_string_contains("kp=1"))
        .and(HeaderIs("Accept-Language", "de-DE,de;q=0.9,en;q=0.8"))
        .respond_with(html(results_page(&[("Rust", "https://rust-lang.org/", "")], None)))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend(&server).with_options(TextOptions {
        region: "de-de".to_string(),
        safesearch: SafeSearch::On,
        timelimit: None,
    });
    let mut session = backend.open().await.unwrap();
    let records: Vec<_> = session.text("rust", Some(5)).try_collect().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].body, None);
}

#[tokio::test]
async fn test_stream_is_lazy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(html(results_page(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = backend(&server).open().await.unwrap();
    let stream = session.text("rust", Some(5));
    drop(stream);
}

#[tokio::test]
async fn test_negative_timeout_fails_the_search() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/html/"))
        .respond_with(html(results_page(&[], None)))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = Settings::default();
    settings.search.html_url = format!("{}/html/", server.uri());
    settings.outgoing.request_timeout = -1.0;

    let response = search(&DuckDuckGo::from_settings(&settings), "rust", 5).await;

    assert!(!response.is_success());
    assert_eq!(response.query(), "rust");
    assert!(response.results().is_empty());
    assert!(response.error().unwrap().contains("invalid request timeout"));
}
