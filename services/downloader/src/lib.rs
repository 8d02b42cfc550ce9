//! LANCE AMSR2 near-real-time granule fetcher.
//!
//! Lists AU_SI12 NRT granules in NASA CMR, keeps one granule per day
//! (final over provisional), drops a provisional latest day and downloads
//! the rest through an Earthdata Login session. Downloaded files are read
//! back with `pm_tb_data::products::amsr::lance`.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod download;
pub mod fetch;
pub mod granules;

pub use auth::{AuthError, CredentialSource, EarthdataSession};
pub use catalog::{CatalogEntry, CmrCatalog, GranuleCatalog};
pub use config::FetcherConfig;
pub use download::{download_granule, DownloadError};
pub use fetch::{FetchOptions, FetchReport, LanceFetcher};
pub use granules::{filter_out_last_day, FileType, GranuleInfo, GranuleParser, GranulesByDate};
