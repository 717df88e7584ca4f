//! fbloader library
//!
//! Resolves Facebook video page URLs into downloadable quality options and
//! serves them over a small JSON API.

pub mod extractor;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use extractor::{
    validate, CanonicalUrl, Extractor, HybridExtractor, Provenance, VideoQuality, VideoResult,
};
pub use server::{build_router, AppState};
pub use utils::{AppSettings, FbloaderError};
