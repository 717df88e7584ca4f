//! Data structures for resolved video information

use crate::utils::format::suggested_filename;
use serde::{Deserialize, Serialize};

/// Maximum number of quality entries in a result
pub const MAX_QUALITIES: usize = 3;

/// Maximum title length (characters)
pub const MAX_TITLE_LEN: usize = 100;

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Extracted from the fetched page
    Scraped,
    /// Synthetic placeholder data
    Fallback,
}

/// One downloadable rendition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQuality {
    pub label: String,
    pub url: String,
    pub size_description: String,
    pub mime_type: String,
    #[serde(default)]
    pub suggested_filename: String,
}

impl VideoQuality {
    pub fn new(
        title: &str,
        label: impl Into<String>,
        url: impl Into<String>,
        size_description: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let label = label.into();
        let mime_type = mime_type.into();
        Self {
            suggested_filename: suggested_filename(title, &label, &mime_type),
            label,
            url: url.into(),
            size_description: size_description.into(),
            mime_type,
        }
    }
}

/// Informational, free-text metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub views_description: String,
    pub upload_date_description: String,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Resolution result returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub title: String,
    pub thumbnail_url: String,
    pub duration_description: String,
    pub qualities: Vec<VideoQuality>,
    pub metadata: VideoMetadata,
    pub source: Provenance,
}

impl VideoResult {
    pub fn is_fallback(&self) -> bool {
        self.source == Provenance::Fallback
    }
}
