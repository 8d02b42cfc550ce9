//! AE_SI12 / AE_SI25: AMSR-E daily polar gridded Tbs (HDF-EOS2).
//!
//! Tb fields are stored as raw int16 tenths of a Kelvin without packing
//! attributes, so they are scaled here rather than by the reader.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{normalize_amsr_tbs, AmsrProduct, AmsrResolution};
use crate::locate::{date_dir_name, exact_name, find_exactly_one, Search};
use crate::products::{request_context, Product};

/// File name for a day, e.g. `AMSR_E_L3_SeaIce12km_V15_20100101.hdf`.
pub fn filename(date: NaiveDate, resolution: AmsrResolution) -> String {
    format!(
        "AMSR_E_L3_SeaIce{}km_V15_{}.hdf",
        resolution.as_str(),
        date.format("%Y%m%d")
    )
}

/// Path of the day's file under `data_dir/YYYY.MM.DD/`.
pub fn get_fp_on_disk(
    data_dir: &Path,
    date: NaiveDate,
    hemisphere: Hemisphere,
    resolution: AmsrResolution,
) -> TbResult<PathBuf> {
    find_exactly_one(
        &data_dir.join(date_dir_name(date)),
        &exact_name(&filename(date, resolution))?,
        Search::Shallow,
        &request_context(Product::AeSi, date, hemisphere),
    )
}

/// Read and normalize a day of AE_SI Tbs.
#[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn get_tbs_from_disk(
    date: NaiveDate,
    hemisphere: Hemisphere,
    data_dir: &Path,
    resolution: AmsrResolution,
) -> TbResult<TbDataset> {
    let path = get_fp_on_disk(data_dir, date, hemisphere, resolution)?;
    // Grid groups are flattened; names already carry the hemisphere.
    let fields = netcdf_parser::read_all_fields(&path)?;

    Ok(
        normalize_amsr_tbs(fields, resolution, hemisphere, AmsrProduct::AeSi, &path)?
            .with_source(Product::AeSi.name(), resolution.km(), "km"),
    )
}
