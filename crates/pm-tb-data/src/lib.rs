//! Passive-microwave brightness-temperature access.
//!
//! Locates, reads and normalizes daily Tb grids from NSIDC products into a
//! [`TbDataset`] keyed by canonical channel (`h19`, `v37`, ...).
//!
//! # Architecture
//!
//! - [`locate`]: date/hemisphere/resolution to file path(s)
//! - [`binary`]: flat little-endian int16 grids (NSIDC-0007, NSIDC-0802)
//! - `netcdf-parser`: netCDF/HDF5 containers (NSIDC-0001, NSIDC-0080, AMSR)
//! - [`normalize`]: product field names to canonical keys, value decoding
//! - [`products`]: per-product readers and the [`read_tbs`] dispatcher
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use pm_tb_data::{read_tbs, DataDirsConfig, Hemisphere, Product, TbRequest};
//!
//! let date = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
//! let request = TbRequest::new(Product::AuSi, date, Hemisphere::North);
//! let tbs = read_tbs(&request, &DataDirsConfig::default()).unwrap();
//! assert!(tbs.contains("h18"));
//! ```

pub mod binary;
pub mod config;
pub mod locate;
pub mod normalize;
pub mod products;

// Re-exports
pub use binary::{decode_binary_tbs, read_binary_tb_file, BinaryReadMode};
pub use config::DataDirsConfig;
pub use locate::{find_exactly_one, find_files, find_one_per_channel, locate_with_fallback, Search};
pub use normalize::{normalize_fields, Decoding, NamingScheme};
pub use products::{
    read_tbs, AmsrProduct, AmsrResolution, DmspPlatform, DmspResolution, Product, TbRequest,
};
pub use tb_common::{ChannelKey, Grid, Hemisphere, TbDataset, TbError, TbResult};
