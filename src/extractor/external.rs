//! Third-party resolver probing
//!
//! None of the configured services has a documented response contract, so
//! responses are probed and logged but never turned into a result. This stage
//! always yields `None`; it exists as the extension point where a real
//! provider integration would parse its response.

use crate::extractor::fetcher::build_client;
use crate::extractor::models::VideoResult;
use crate::extractor::traits::Extractor;
use crate::utils::config::AppSettings;
use crate::utils::error::FbloaderError;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, warn};

pub struct ExternalResolver {
    client: Client,
    endpoints: Vec<String>,
}

impl ExternalResolver {
    pub fn new(settings: &AppSettings) -> Result<Self, FbloaderError> {
        let client = build_client(
            settings,
            settings.external_timeout(),
            settings.max_redirects,
        )?;
        Ok(Self {
            client,
            endpoints: settings.external_endpoints.clone(),
        })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Probe one endpoint; returns the HTTP status on success.
    /// Failures are logged here and never propagate.
    async fn probe(&self, endpoint: &str, url: &str) -> Option<u16> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("url", url)])
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => Some(resp.status().as_u16()),
            Ok(resp) => {
                debug!("External resolver {} returned {}", endpoint, resp.status());
                None
            }
            Err(e) => {
                warn!("External resolver {} failed: {}", endpoint, e);
                None
            }
        }
    }
}

#[async_trait]
impl Extractor for ExternalResolver {
    fn id(&self) -> &'static str {
        "external"
    }

    fn supports(&self, _url: &str) -> bool {
        !self.endpoints.is_empty()
    }

    async fn extract_info(&self, url: &str) -> Result<Option<VideoResult>> {
        // Probes run concurrently; each carries the client timeout.
        let probes = self.endpoints.iter().map(|endpoint| self.probe(endpoint, url));
        let answered = join_all(probes).await.into_iter().flatten().count();

        debug!(
            "{} of {} external resolver(s) answered; responses are not parsed",
            answered,
            self.endpoints.len()
        );
        Ok(None)
    }
}
