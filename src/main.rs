//! fbloader - Facebook video link resolver
//!
//! Serves the static client and the JSON API, or resolves a single URL
//! headlessly with `--resolve`.

use anyhow::{Context, Result};
use clap::Parser;
use fbloader::extractor::{self, HybridExtractor};
use fbloader::server;
use fbloader::utils::AppSettings;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Resolve Facebook video links into downloadable files")]
struct Args {
    /// Path to a JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    bind: Option<String>,

    /// Resolve one URL, print the result as JSON and exit
    #[arg(long)]
    resolve: Option<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fbloader=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings =
        AppSettings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    let rt = tokio::runtime::Runtime::new()?;

    if let Some(url) = args.resolve {
        // Run headless resolution inside the runtime
        return rt.block_on(resolve_cli(settings, url));
    }

    rt.block_on(server::serve(settings))?;
    Ok(ExitCode::SUCCESS)
}

async fn resolve_cli(settings: AppSettings, url: String) -> Result<ExitCode> {
    let canonical = match extractor::validate(&url) {
        Ok(canonical) => canonical,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let pipeline = HybridExtractor::from_settings(&settings)?;
    match pipeline.resolve(canonical.as_str()).await {
        Some(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.is_fallback() {
                eprintln!("No real video data found; printed fallback data");
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Could not find a downloadable video at {}", canonical);
            Ok(ExitCode::FAILURE)
        }
    }
}
