//! Local access to LANCE AMSR2 near-real-time files.
//!
//! The downloader drops AU_SI12 NRT granules into a flat directory; they
//! are read exactly like AU_SI12 files.

use std::path::Path;

use chrono::NaiveDate;
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{au_si, AmsrResolution};
use crate::products::{request_context, Product};

/// LANCE only publishes the 12 km grid.
const RESOLUTION: AmsrResolution = AmsrResolution::Km12;

/// Read a day of LANCE AMSR2 Tbs from anywhere below `data_dir`.
#[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn access_local_lance_data(
    date: NaiveDate,
    data_dir: &Path,
    hemisphere: Hemisphere,
) -> TbResult<TbDataset> {
    let path = au_si::get_au_si_fp_on_disk(
        data_dir,
        date,
        RESOLUTION,
        &request_context(Product::Lance, date, hemisphere),
    )?;

    Ok(au_si::get_au_si_tbs_from_disk(hemisphere, RESOLUTION, &path)?.with_source(
        Product::Lance.name(),
        RESOLUTION.km(),
        "km",
    ))
}
