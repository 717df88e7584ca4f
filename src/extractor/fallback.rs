//! Synthetic placeholder results
//!
//! Used when nothing real could be resolved so the client always has
//! something to render. Results are tagged [`Provenance::Fallback`]. Only the
//! token-derived fields (title, thumbnail) are stable per URL; duration and
//! view count are randomized on every call.

use crate::extractor::models::{Provenance, VideoMetadata, VideoQuality, VideoResult};
use crate::utils::format::format_thousands;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Local;
use rand::Rng;

const TOKEN_LEN: usize = 8;

const SAMPLE_HD_URL: &str = "https://sample-videos.com/video321/mp4/720/big_buck_bunny_720p_1mb.mp4";
const SAMPLE_SD_URL: &str = "https://sample-videos.com/video321/mp4/360/big_buck_bunny_360p_1mb.mp4";

/// Short opaque token for a URL.
///
/// The tail of the URL-safe base64 encoding is used: every `https://...`
/// input shares the same leading characters, the trailing ones carry the id.
pub fn fallback_token(url: &str) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(url.as_bytes());
    let start = encoded.len().saturating_sub(TOKEN_LEN);
    encoded[start..].to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Always succeeds
    pub fn generate(&self, url: &str) -> VideoResult {
        let token = fallback_token(url);
        let title = format!("Facebook Video - {}", token);
        let mut rng = rand::thread_rng();

        let duration = format!("{}:{:02}", rng.gen_range(1..=5), rng.gen_range(0..60));
        let views: u64 = rng.gen_range(1_000..11_000);

        VideoResult {
            thumbnail_url: format!("https://picsum.photos/seed/{}/400/300", token),
            duration_description: duration,
            qualities: vec![
                VideoQuality::new(&title, "HD 720p", SAMPLE_HD_URL, "1.2 MB", "video/mp4"),
                VideoQuality::new(&title, "SD 360p", SAMPLE_SD_URL, "0.8 MB", "video/mp4"),
            ],
            metadata: VideoMetadata {
                views_description: format_thousands(views),
                upload_date_description: Local::now().format("%Y-%m-%d").to_string(),
                source_name: "Facebook".to_string(),
                description: None,
            },
            title,
            source: Provenance::Fallback,
        }
    }
}
