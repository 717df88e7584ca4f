use crate::extractor::external::ExternalResolver;
use crate::extractor::fallback::FallbackGenerator;
use crate::extractor::fetcher::HtmlFetcher;
use crate::extractor::models::VideoResult;
use crate::extractor::scrape::ScrapeExtractor;
use crate::extractor::traits::Extractor;
use crate::utils::config::AppSettings;
use crate::utils::error::FbloaderError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Resolution Orchestrator
///
/// Runs the registered stages in order and returns the first result that has
/// at least one quality option. Stage failures and empty results both advance
/// to the next stage. When every stage comes up empty the fallback generator
/// answers, unless it was disabled (strict mode).
pub struct HybridExtractor {
    extractors: Vec<Arc<dyn Extractor>>,
    fallback: Option<FallbackGenerator>,
}

impl HybridExtractor {
    /// Create a new HybridExtractor with the given stages and fallback
    pub fn new(extractors: Vec<Arc<dyn Extractor>>, fallback: Option<FallbackGenerator>) -> Self {
        Self {
            extractors,
            fallback,
        }
    }

    /// Standard chain: scrape, external resolvers, then fallback unless strict
    pub fn from_settings(settings: &AppSettings) -> Result<Self, FbloaderError> {
        let scrape = Arc::new(ScrapeExtractor::new(HtmlFetcher::new(settings)?));
        let external = Arc::new(ExternalResolver::new(settings)?);

        let extractors: Vec<Arc<dyn Extractor>> = vec![scrape, external];
        let fallback = (!settings.strict).then(FallbackGenerator::new);
        Ok(Self::new(extractors, fallback))
    }

    pub fn stage_ids(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.id()).collect()
    }

    /// Resolve a canonical URL.
    ///
    /// `None` only when the fallback is disabled and no stage produced a result.
    pub async fn resolve(&self, url: &str) -> Option<VideoResult> {
        for extractor in &self.extractors {
            if !extractor.supports(url) {
                debug!("Skipping extractor {} for {}", extractor.id(), url);
                continue;
            }

            debug!("Routing to extractor: {}", extractor.id());
            match extractor.extract_info(url).await {
                Ok(Some(result)) if !result.qualities.is_empty() => {
                    info!("Resolved {} via {}", url, extractor.id());
                    return Some(result);
                }
                Ok(_) => {
                    debug!("Extractor {} found nothing for {}", extractor.id(), url);
                }
                Err(e) => {
                    warn!(
                        "Extractor {} failed: {}. Trying next stage...",
                        extractor.id(),
                        e
                    );
                }
            }
        }

        match &self.fallback {
            Some(fallback) => {
                info!("All extractors came up empty for {}; using fallback data", url);
                Some(fallback.generate(url))
            }
            None => {
                info!("All extractors came up empty for {}; fallback disabled", url);
                None
            }
        }
    }
}
