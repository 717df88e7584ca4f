//! HtmlFetcher against a local server: success, status errors, redirect bound and timeout.

use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use fbloader::extractor::HtmlFetcher;
use fbloader::utils::{AppSettings, FbloaderError};
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn test_app() -> Router {
    Router::new()
        .route("/page", get(|| async { Html("<html><title>ok</title></html>") }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "nope") }),
        )
        .route("/gone", get(|| async { StatusCode::NOT_FOUND }))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/hop", get(|| async { Redirect::temporary("/page") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html("too late")
            }),
        )
}

fn fetcher() -> HtmlFetcher {
    let settings = AppSettings {
        fetch_timeout_secs: 1,
        ..Default::default()
    };
    HtmlFetcher::new(&settings).expect("fetcher")
}

#[tokio::test]
async fn test_fetch_success() {
    let base = spawn_server(test_app()).await;
    let html = fetcher()
        .fetch_html(&format!("{}/page", base))
        .await
        .expect("fetch");
    assert!(html.contains("<title>ok</title>"));
}

#[tokio::test]
async fn test_follows_short_redirects() {
    let base = spawn_server(test_app()).await;
    let html = fetcher()
        .fetch_html(&format!("{}/hop", base))
        .await
        .expect("fetch");
    assert!(html.contains("ok"));
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let base = spawn_server(test_app()).await;
    let fetcher = fetcher();

    let err = fetcher
        .fetch_html(&format!("{}/broken", base))
        .await
        .unwrap_err();
    assert!(matches!(err, FbloaderError::HttpStatus(500)), "{:?}", err);

    let err = fetcher
        .fetch_html(&format!("{}/gone", base))
        .await
        .unwrap_err();
    assert!(matches!(err, FbloaderError::HttpStatus(404)), "{:?}", err);
    assert!(err.is_fetch_error());
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    let base = spawn_server(test_app()).await;
    let err = fetcher()
        .fetch_html(&format!("{}/loop", base))
        .await
        .unwrap_err();
    assert!(matches!(err, FbloaderError::TooManyRedirects(_)), "{:?}", err);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let base = spawn_server(test_app()).await;
    let started = std::time::Instant::now();
    let err = fetcher()
        .fetch_html(&format!("{}/slow", base))
        .await
        .unwrap_err();
    assert!(matches!(err, FbloaderError::Timeout(_)), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let settings = AppSettings {
        fetch_timeout_secs: 2,
        ..Default::default()
    };
    let fetcher = HtmlFetcher::new(&settings).expect("fetcher");
    // Port 9 (discard) is closed on loopback in test environments
    let err = fetcher
        .fetch_html("http://127.0.0.1:9/")
        .await
        .unwrap_err();
    assert!(err.is_fetch_error(), "{:?}", err);
}

#[test]
fn test_invalid_proxy_is_config_error() {
    let settings = AppSettings {
        proxy: Some("::not a proxy::".to_string()),
        ..Default::default()
    };
    let err = HtmlFetcher::new(&settings).err().expect("should fail");
    assert!(matches!(err, FbloaderError::ConfigError(_)));
}
