use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use redbook_extract::error::ScrapeError;
use redbook_extract::extract::Scraper;
use redbook_extract::models::{BODY_FALLBACK, TITLE_FALLBACK};

const NOTE_HTML: &str = r#"<html><head>
<meta name="og:title" content="My Note - 小红书">
<meta name="og:image" content="https://img.example/1.jpg">
<meta name="og:image" content="https://img.example/2.jpg">
</head><body>
<div id="detail-desc"> hello world </div>
</body></html>"#;

#[tokio::test]
async fn fetches_and_extracts_a_note_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/note"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NOTE_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new().unwrap();
    let url = format!("{}/note", server.uri());
    let note = scraper.fetch_note(&url).await.unwrap();

    assert_eq!(note.title.as_deref(), Some("My Note"));
    assert_eq!(note.content.as_deref(), Some("hello world"));
    assert_eq!(
        note.images,
        vec!["https://img.example/1.jpg", "https://img.example/2.jpg"]
    );
    assert_eq!(note.url, url);
}

#[tokio::test]
async fn requests_carry_browser_headers() {
    let server = MockServer::start().await;

    // The page serves different markup without these, so the mock only
    // answers requests that look like a desktop browser.
    Mock::given(method("GET"))
        .and(path("/note"))
        .and(header(
            "user-agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        ))
        .and(header("accept-language", "zh-CN,zh;q=0.9,en;q=0.8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NOTE_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = Scraper::new().unwrap();
    scraper
        .fetch_note(&format!("{}/note", server.uri()))
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn page_without_hook_points_falls_back_without_failing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let scraper = Scraper::new().unwrap();
    let note = scraper
        .fetch_note(&format!("{}/bare", server.uri()))
        .await
        .unwrap();

    assert_eq!(note.display_title(), TITLE_FALLBACK);
    assert_eq!(note.display_content(), BODY_FALLBACK);
    assert!(note.images.is_empty());
}

#[tokio::test]
async fn page_fetch_404_surfaces_as_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scraper = Scraper::new().unwrap();
    let err = scraper
        .fetch_note(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Status(s) if s.as_u16() == 404));
}

#[tokio::test]
async fn connection_failure_surfaces_as_fetch_error() {
    let server = MockServer::start().await;
    let url = format!("{}/note", server.uri());
    drop(server);

    let scraper = Scraper::new().unwrap();
    let err = scraper.fetch_note(&url).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Fetch(_)));
}
