//! Print a per-channel summary of one day of Tbs.
//!
//! ```text
//! inspect-tbs --product AU_SI --date 2022-03-01 --hemisphere north --resolution 12
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use pm_tb_data::{
    read_tbs, BinaryReadMode, DataDirsConfig, DmspPlatform, Hemisphere, Product, TbDataset,
    TbRequest,
};

#[derive(Parser, Debug)]
#[command(name = "inspect-tbs")]
#[command(about = "Read and summarize passive-microwave brightness temperatures")]
struct Args {
    /// Product (NSIDC-0001, NSIDC-0080, NSIDC-0007, NSIDC-0802, AU_SI, AE_SI, LANCE)
    #[arg(long)]
    product: Product,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    /// Hemisphere (north or south)
    #[arg(long, default_value = "north")]
    hemisphere: Hemisphere,

    /// Resolution token (25, 12.5 or 12); product default if unset
    #[arg(long)]
    resolution: Option<String>,

    /// DMSP platform for NSIDC-0001/0080 (e.g. F17)
    #[arg(long)]
    platform: Option<DmspPlatform>,

    /// Override the product's data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// YAML file with product data directories
    #[arg(long, env = "PM_TB_DATA_CONFIG")]
    config: Option<PathBuf>,

    /// Substitute missing grids for malformed binary files instead of failing
    #[arg(long)]
    tolerant: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Serialize)]
struct ChannelSummary {
    channel: String,
    rows: usize,
    cols: usize,
    valid_cells: usize,
    min_kelvin: Option<f64>,
    max_kelvin: Option<f64>,
}

fn summarize(dataset: &TbDataset) -> Vec<ChannelSummary> {
    dataset
        .iter()
        .map(|(key, var)| {
            let range = var.grid.value_range();
            ChannelSummary {
                channel: key.to_string(),
                rows: var.grid.rows(),
                cols: var.grid.cols(),
                valid_cells: var.grid.valid_count(),
                min_kelvin: range.map(|(lo, _)| lo),
                max_kelvin: range.map(|(_, hi)| hi),
            }
        })
        .collect()
}

/// Apply a single-directory override to whichever product is requested.
fn with_data_dir(mut dirs: DataDirsConfig, product: Product, dir: PathBuf) -> DataDirsConfig {
    match product {
        Product::Nsidc0001 => dirs.nsidc_0001 = dir,
        Product::Nsidc0080 => dirs.nsidc_0080 = dir,
        Product::Nsidc0007 => dirs.nsidc_0007 = dir,
        Product::Nsidc0802 => dirs.nsidc_0802 = Some(dir),
        Product::AuSi => {
            dirs.au_si_12 = dir.clone();
            dirs.au_si_25 = dir;
        }
        Product::AeSi => {
            dirs.ae_si_12 = dir.clone();
            dirs.ae_si_25 = dir;
        }
        Product::Lance => dirs.lance = Some(dir),
    }
    dirs
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    netcdf_parser::silence_hdf5_errors();

    let mut dirs = match &args.config {
        Some(path) => DataDirsConfig::load(path)
            .with_context(|| format!("Failed to load data directories from {}", path.display()))?,
        None => DataDirsConfig::default(),
    };
    if let Some(dir) = args.data_dir.clone() {
        dirs = with_data_dir(dirs, args.product, dir);
    }

    let request = TbRequest {
        product: args.product,
        date: args.date,
        hemisphere: args.hemisphere,
        resolution: args.resolution.clone(),
        platform: args.platform,
        binary_mode: if args.tolerant {
            BinaryReadMode::Tolerant
        } else {
            BinaryReadMode::Strict
        },
    };

    let dataset = read_tbs(&request, &dirs).with_context(|| {
        format!(
            "Failed to read {} Tbs for {} ({})",
            args.product, args.date, args.hemisphere
        )
    })?;
    info!(channels = dataset.len(), "Loaded dataset");

    let summary = summarize(&dataset);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if let Some(source) = dataset.source() {
            println!(
                "{} {} {} ({} {})",
                source.data_source, args.date, args.hemisphere, source.resolution, source.resolution_units
            );
        }
        for s in &summary {
            println!(
                "{:>5}  {}x{}  valid={:<7} min={:<8} max={}",
                s.channel,
                s.rows,
                s.cols,
                s.valid_cells,
                s.min_kelvin.map_or("-".to_string(), |v| format!("{:.1}", v)),
                s.max_kelvin.map_or("-".to_string(), |v| format!("{:.1}", v)),
            );
        }
    }

    Ok(())
}
