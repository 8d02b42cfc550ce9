//! NSIDC-0007: Nimbus-7 SMMR polar gridded radiances (v1).
//!
//! Flat binary files, one per channel, under `TBS/{YYYY}/{MON}/`, named
//! `{yymmdd}{N|S}.{cc}{H|V}` (e.g. `800929S.37H`).

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{read_binary_channel_files, request_context, Product};
use crate::binary::BinaryReadMode;
use crate::locate::{find_one_per_channel, Search};
use crate::normalize::NamingScheme;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Grid resolution of the SMMR binary grids, in km.
const RESOLUTION_KM: f64 = 25.0;

/// Directory holding a day's files, relative to the dataset root.
pub fn day_dir(data_dir: &Path, date: NaiveDate) -> PathBuf {
    data_dir
        .join("TBS")
        .join(date.year().to_string())
        .join(MONTHS[date.month0() as usize])
}

/// Read all channels for a day.
///
/// `data_dir` is the dataset root (the directory containing `TBS/`).
#[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn get_tbs_from_disk(
    date: NaiveDate,
    hemisphere: Hemisphere,
    data_dir: &Path,
    mode: BinaryReadMode,
) -> TbResult<TbDataset> {
    let dir = day_dir(data_dir, date);
    let scheme = NamingScheme::nsidc_0007_file(date, hemisphere)?;
    let paths = find_one_per_channel(
        &dir,
        scheme.regex(),
        Search::Shallow,
        &request_context(Product::Nsidc0007, date, hemisphere),
    )?;

    Ok(read_binary_channel_files(&paths, &scheme, hemisphere, mode, &dir)?
        .with_source(Product::Nsidc0007.name(), RESOLUTION_KM, "km"))
}
