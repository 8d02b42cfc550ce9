//! LANCE AMSR2 downloader.
//!
//! Fetches every AU_SI12 NRT granule that is ready for near-real-time use
//! into a flat output directory. Requires `EARTHDATA_USERNAME` and
//! `EARTHDATA_PASSWORD` when the data host redirects to Earthdata Login.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use downloader::{CmrCatalog, CredentialSource, FetchOptions, FetcherConfig, LanceFetcher};

#[derive(Parser, Debug)]
#[command(name = "downloader")]
#[command(about = "Download LANCE AMSR2 near-real-time granules")]
struct Args {
    /// Directory for downloaded granules
    #[arg(long, env = "LANCE_OUTPUT_DIR", default_value = "/tmp/lance")]
    output_dir: PathBuf,

    /// Replace granules already in the output directory
    #[arg(long)]
    overwrite: bool,

    /// Fail on the first granule that cannot be downloaded
    #[arg(long)]
    strict: bool,

    /// CMR collection short name (overrides the config file)
    #[arg(long)]
    short_name: Option<String>,

    /// YAML fetcher configuration
    #[arg(long, env = "DOWNLOADER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if args.json_logs {
        fmt().with_env_filter(filter).with_target(true).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    let mut config = match &args.config {
        Some(path) => FetcherConfig::load(path)
            .with_context(|| format!("Failed to load fetcher config from {}", path.display()))?,
        None => FetcherConfig::default(),
    };
    if let Some(short_name) = args.short_name.clone() {
        config.short_name = short_name;
    }

    info!(
        short_name = %config.short_name,
        output_dir = %args.output_dir.display(),
        "Starting LANCE AMSR2 download"
    );

    let catalog = CmrCatalog::new(&config)?;
    let mut fetcher = LanceFetcher::new(catalog, &config, CredentialSource::Environment)?;
    let options = FetchOptions {
        output_dir: args.output_dir.clone(),
        overwrite: args.overwrite,
        strict: args.strict,
    };

    let report = fetcher
        .download_latest_lance_files(&options)
        .await
        .context("LANCE download failed")?;

    for path in &report.downloaded {
        info!(path = %path.display(), "Downloaded");
    }
    info!(
        downloaded = report.downloaded.len(),
        already_present = report.already_present.len(),
        skipped = report.skipped.len(),
        "Done"
    );

    Ok(())
}
