//! Error handling for fbloader

use thiserror::Error;

/// Main error type for fbloader
#[derive(Debug, Error)]
pub enum FbloaderError {
    #[error("Invalid Facebook URL: {0}")]
    InvalidUrl(String),

    #[error("Facebook video URL is required")]
    MissingUrl,

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Upstream responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("Too many redirects while fetching {0}")]
    TooManyRedirects(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FbloaderError {
    /// Whether this error came from reaching the source page.
    ///
    /// Fetch errors are recovered by the resolution chain and never reach the client.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            FbloaderError::Timeout(_)
                | FbloaderError::HttpStatus(_)
                | FbloaderError::TooManyRedirects(_)
                | FbloaderError::NetworkError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        assert!(FbloaderError::HttpStatus(503).is_fetch_error());
        assert!(FbloaderError::Timeout("12s".into()).is_fetch_error());
        assert!(!FbloaderError::InvalidUrl("x".into()).is_fetch_error());
        assert!(!FbloaderError::MissingUrl.is_fetch_error());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FbloaderError::HttpStatus(404).to_string(),
            "Upstream responded with HTTP 404"
        );
        assert_eq!(
            FbloaderError::MissingUrl.to_string(),
            "Facebook video URL is required"
        );
    }
}
