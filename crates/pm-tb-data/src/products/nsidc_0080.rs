//! NSIDC-0080: near-real-time DMSP SSMIS daily polar gridded Tbs (v2).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{request_context, require_platform, DmspPlatform, DmspResolution, Product};
use crate::locate::{date_dir_name, exact_name, find_exactly_one, Search};
use crate::normalize::{normalize_fields, Decoding, NamingScheme};

/// Platforms with NSIDC-0080 data.
pub const PLATFORMS: &[DmspPlatform] = &[DmspPlatform::F16, DmspPlatform::F17, DmspPlatform::F18];

/// File name for a day, e.g. `NSIDC0080_TB_PS_S25km_20230915_v2.0.nc`.
pub fn filename(date: NaiveDate, hemisphere: Hemisphere, resolution: DmspResolution) -> String {
    format!(
        "NSIDC0080_TB_PS_{}{}km_{}_v2.0.nc",
        hemisphere.initial(),
        resolution.as_str(),
        date.format("%Y%m%d")
    )
}

/// Path of the day's file under `data_dir/YYYY.MM.DD/`.
pub fn get_fp_on_disk(
    data_dir: &Path,
    date: NaiveDate,
    hemisphere: Hemisphere,
    resolution: DmspResolution,
) -> TbResult<PathBuf> {
    find_exactly_one(
        &data_dir.join(date_dir_name(date)),
        &exact_name(&filename(date, hemisphere, resolution))?,
        Search::Shallow,
        &request_context(Product::Nsidc0080, date, hemisphere),
    )
}

/// Read and normalize one day of NSIDC-0080 Tbs for a platform.
#[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn get_tbs_from_disk(
    date: NaiveDate,
    hemisphere: Hemisphere,
    data_dir: &Path,
    resolution: DmspResolution,
    platform: DmspPlatform,
) -> TbResult<TbDataset> {
    require_platform(Product::Nsidc0080, platform, PLATFORMS)?;

    let path = get_fp_on_disk(data_dir, date, hemisphere, resolution)?;
    let fields = netcdf_parser::read_group_fields(&path, Some(platform.id()))?;
    let scheme = NamingScheme::nsidc_0080(hemisphere, platform.id())?;

    Ok(normalize_fields(fields, &scheme, Decoding::AlreadyDecoded, &path)?
        .with_source(Product::Nsidc0080.name(), resolution.km(), "km"))
}
