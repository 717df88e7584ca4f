use crate::extractor::models::VideoResult;
use anyhow::Result;
use async_trait::async_trait;

/// Core trait for every stage of the resolution chain
///
/// A stage either produces a result, reports that it found nothing
/// (`Ok(None)`), or fails. The orchestrator treats the last two the same way:
/// it moves on to the next stage.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this stage (e.g., "html-scrape", "external")
    fn id(&self) -> &'static str;

    /// Checks if this stage should run for the given canonical URL
    fn supports(&self, url: &str) -> bool;

    /// Attempts to resolve the canonical URL
    async fn extract_info(&self, url: &str) -> Result<Option<VideoResult>>;
}
