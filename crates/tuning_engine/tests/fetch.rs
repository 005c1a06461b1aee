use std::time::Duration;

use tuning_engine::{FailureKind, FetchSettings, Fetcher, FileFetcher, HttpFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&FetchSettings::default()).expect("client builds")
}

#[tokio::test]
async fn fetcher_returns_body_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .and(header(
            "user-agent",
            concat!("freebsd-tuning-update/", env!("CARGO_PKG_VERSION")),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/doc", server.uri());
    let output = fetcher().fetch(&url).await.expect("fetch ok");

    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, url);
    assert_eq!(output.metadata.byte_len, 15);
    assert_eq!(
        output.metadata.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(output.bytes, b"<html>ok</html>");
}

#[tokio::test]
async fn fetcher_accepts_any_content_type_and_size() {
    let body = format!("<h3>/etc/sysctl.conf</h3><pre>label\n{}</pre>", "x=1\n".repeat(2_000_000));
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mirror.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), "text/plain"))
        .mount(&server)
        .await;

    let url = format!("{}/mirror.txt", server.uri());
    let output = fetcher().fetch(&url).await.expect("fetch ok");

    assert_eq!(output.metadata.content_type.as_deref(), Some("text/plain"));
    assert_eq!(output.bytes.len(), body.len());
}

#[tokio::test]
async fn fetcher_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let output = fetcher()
        .fetch(&format!("{}/old", server.uri()))
        .await
        .expect("fetch ok");

    assert_eq!(output.metadata.final_url, format!("{}/new", server.uri()));
    assert_eq!(output.bytes, b"moved");
}

#[tokio::test]
async fn fetcher_gives_up_on_redirect_loops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/loop", server.uri())),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_redirects: 2,
        ..FetchSettings::default()
    };
    let fetcher = HttpFetcher::new(&settings).unwrap();

    let err = fetcher
        .fetch(&format!("{}/loop", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = HttpFetcher::new(&settings).unwrap();

    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let err = fetcher().fetch("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn file_fetcher_reads_saved_page() {
    let temp = tempfile::TempDir::new().unwrap();
    let saved = temp.path().join("page.html");
    std::fs::write(&saved, "<h3>x</h3>").unwrap();

    let output = FileFetcher::new(&saved)
        .fetch("https://example.invalid/page")
        .await
        .unwrap();
    assert_eq!(output.bytes, b"<h3>x</h3>");
    assert_eq!(output.metadata.original_url, "https://example.invalid/page");
    assert_eq!(output.metadata.content_type, None);
}

#[tokio::test]
async fn file_fetcher_reports_missing_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let err = FileFetcher::new(temp.path().join("absent.html"))
        .fetch("https://example.invalid/page")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::LocalFile);
}
