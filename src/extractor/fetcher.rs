//! Single-attempt HTML fetcher with browser-like headers

use crate::utils::config::AppSettings;
use crate::utils::error::FbloaderError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::{redirect, Client, Proxy};
use std::time::Duration;
use tracing::debug;

/// Fetches source pages. One attempt per call, no retries.
#[derive(Clone)]
pub struct HtmlFetcher {
    client: Client,
    timeout: Duration,
}

impl HtmlFetcher {
    /// Build a fetcher from settings (timeout, redirect bound, user agent, proxy)
    pub fn new(settings: &AppSettings) -> Result<Self, FbloaderError> {
        let client = build_client(settings, settings.fetch_timeout(), settings.max_redirects)?;
        Ok(Self {
            client,
            timeout: settings.fetch_timeout(),
        })
    }

    /// GET the page and return its body.
    ///
    /// Network errors, non-2xx responses (after redirects), exceeding the
    /// redirect bound and timeouts are all errors.
    pub async fn fetch_html(&self, url: &str) -> Result<String, FbloaderError> {
        debug!("Fetching HTML from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FbloaderError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await.map_err(|e| self.classify(url, e))?;
        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> FbloaderError {
        if e.is_timeout() {
            FbloaderError::Timeout(format!("{} after {:?}", url, self.timeout))
        } else if e.is_redirect() {
            FbloaderError::TooManyRedirects(url.to_string())
        } else {
            FbloaderError::NetworkError(e)
        }
    }
}

/// Shared outbound client construction for the fetcher and external resolver
pub(crate) fn build_client(
    settings: &AppSettings,
    timeout: Duration,
    max_redirects: usize,
) -> Result<Client, FbloaderError> {
    let mut builder = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(browser_headers())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(redirect::Policy::limited(max_redirects));

    if let Some(proxy) = &settings.proxy {
        let proxy = Proxy::all(proxy.as_str())
            .map_err(|e| FbloaderError::ConfigError(format!("invalid proxy {}: {}", proxy, e)))?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(FbloaderError::from)
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers
}
