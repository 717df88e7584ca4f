pub mod external;
pub mod fallback;
pub mod fetcher;
pub mod html;
pub mod hybrid;
pub mod models;
pub mod scrape;
pub mod traits;
pub mod validator;

pub use external::ExternalResolver;
pub use fallback::{fallback_token, FallbackGenerator};
pub use fetcher::HtmlFetcher;
pub use hybrid::HybridExtractor;
pub use models::{Provenance, VideoMetadata, VideoQuality, VideoResult};
pub use scrape::ScrapeExtractor;
pub use traits::Extractor;
pub use validator::{validate, CanonicalUrl, SUPPORTED_FORMATS};
