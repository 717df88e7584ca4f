use crate::extractor::fetcher::HtmlFetcher;
use crate::extractor::html;
use crate::extractor::models::VideoResult;
use crate::extractor::traits::Extractor;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Fetches the page and mines it for embedded video URLs
pub struct ScrapeExtractor {
    fetcher: HtmlFetcher,
}

impl ScrapeExtractor {
    pub fn new(fetcher: HtmlFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Extractor for ScrapeExtractor {
    fn id(&self) -> &'static str {
        "html-scrape"
    }

    fn supports(&self, _url: &str) -> bool {
        true
    }

    async fn extract_info(&self, url: &str) -> Result<Option<VideoResult>> {
        let html = self.fetcher.fetch_html(url).await?;

        match html::extract(&html) {
            Some(result) => {
                info!(
                    "Scraped {} quality option(s) from {}",
                    result.qualities.len(),
                    url
                );
                Ok(Some(result))
            }
            None => {
                debug!("No video URLs found in {} bytes of HTML", html.len());
                Ok(None)
            }
        }
    }
}
