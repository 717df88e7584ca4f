//! Application configuration

use crate::utils::error::FbloaderError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on redirects followed by the HTML fetcher
pub const MAX_REDIRECTS: usize = 5;

const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Address the HTTP server listens on
    pub bind_addr: String,

    /// Timeout for the source page fetch (seconds)
    pub fetch_timeout_secs: u64,

    /// Redirects followed before the fetch fails
    pub max_redirects: usize,

    /// User agent sent with every outbound request
    pub user_agent: String,

    /// Proxy applied to all outbound HTTP (e.g. "http://127.0.0.1:8080")
    pub proxy: Option<String>,

    /// Third-party resolver endpoints probed after scraping fails
    pub external_endpoints: Vec<String>,

    /// Timeout for each external resolver probe (seconds)
    pub external_timeout_secs: u64,

    /// Disable fallback data; unresolved videos become a 404
    pub strict: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            fetch_timeout_secs: 12,
            max_redirects: MAX_REDIRECTS,
            user_agent: DESKTOP_USER_AGENT.to_string(),
            proxy: None,
            external_endpoints: Vec::new(),
            external_timeout_secs: 8,
            strict: false,
        }
    }
}

impl AppSettings {
    /// Resolve settings from defaults, an optional JSON file and the environment.
    ///
    /// File lookup order: explicit `path`, `$FBLOADER_CONFIG`, then
    /// `<config dir>/fbloader/config.json` when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, FbloaderError> {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("FBLOADER_CONFIG").ok().map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.exists()));

        let mut settings = match file {
            Some(file) => Self::from_file(&file)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings.validate())
    }

    /// Read settings from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, FbloaderError> {
        info!("Loading configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let settings: AppSettings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Apply `FBLOADER_*` / `PORT` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(addr) = read("FBLOADER_BIND") {
            self.bind_addr = addr;
        } else if let Some(port) = read("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.bind_addr = format!("0.0.0.0:{}", port);
        }

        if let Some(secs) = read("FBLOADER_FETCH_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.fetch_timeout_secs = secs,
                Err(_) => warn!("Ignoring FBLOADER_FETCH_TIMEOUT_SECS={:?}", secs),
            }
        }

        if let Some(proxy) = read("FBLOADER_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Some(strict) = read("FBLOADER_STRICT") {
            match strict.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.strict = true,
                "0" | "false" | "no" | "off" => self.strict = false,
                other => warn!("Ignoring FBLOADER_STRICT={:?}", other),
            }
        }

        if let Some(endpoints) = read("FBLOADER_EXTERNAL_ENDPOINTS") {
            self.external_endpoints = endpoints
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(ToString::to_string)
                .collect();
        }
    }

    /// Enforce sane bounds
    pub fn validate(mut self) -> Self {
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = 1;
        }
        if self.external_timeout_secs == 0 {
            self.external_timeout_secs = 1;
        }
        if self.max_redirects > MAX_REDIRECTS {
            debug!(
                "Clamping max_redirects from {} to {}",
                self.max_redirects, MAX_REDIRECTS
            );
            self.max_redirects = MAX_REDIRECTS;
        }
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn external_timeout(&self) -> Duration {
        Duration::from_secs(self.external_timeout_secs)
    }
}

/// `<config dir>/fbloader/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fbloader").join("config.json"))
}
