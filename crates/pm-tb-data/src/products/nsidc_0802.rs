//! NSIDC-0802: AMSR2 near-real-time polar gridded Tbs (binary prototype).
//!
//! One flat binary file per channel, named
//! `tb_as2_{YYYYMMDD}_nrt_{n|s}{cc}{h|v}.bin`, anywhere below the data
//! directory. Grids share the legacy 25 km binary shapes.

use std::path::Path;

use chrono::NaiveDate;
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{read_binary_channel_files, request_context, Product};
use crate::binary::BinaryReadMode;
use crate::locate::{find_one_per_channel, Search};
use crate::normalize::NamingScheme;

const RESOLUTION_KM: f64 = 25.0;

/// Read all channels for a day, searching `data_dir` recursively.
#[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn get_tbs_from_disk(
    date: NaiveDate,
    hemisphere: Hemisphere,
    data_dir: &Path,
    mode: BinaryReadMode,
) -> TbResult<TbDataset> {
    let scheme = NamingScheme::nsidc_0802_file(date, hemisphere)?;
    let paths = find_one_per_channel(
        data_dir,
        scheme.regex(),
        Search::Recursive,
        &request_context(Product::Nsidc0802, date, hemisphere),
    )?;

    Ok(read_binary_channel_files(&paths, &scheme, hemisphere, mode, data_dir)?
        .with_source(Product::Nsidc0802.name(), RESOLUTION_KM, "km"))
}
