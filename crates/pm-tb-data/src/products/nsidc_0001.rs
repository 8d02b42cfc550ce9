//! NSIDC-0001: DMSP SSM/I-SSMIS daily polar gridded Tbs (v6).
//!
//! One netCDF file per day and hemisphere in a `YYYY.MM.DD` subdirectory,
//! with one group per platform. The 19, 22 and 37 GHz channels are on the
//! 25 km grid; 85/91 GHz on the 12.5 km grid.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{request_context, require_platform, DmspPlatform, DmspResolution, Product};
use crate::locate::{date_dir_name, exact_name, find_exactly_one, Search};
use crate::normalize::{normalize_fields, Decoding, NamingScheme};

/// Platforms with NSIDC-0001 data.
pub const PLATFORMS: &[DmspPlatform] = &[
    DmspPlatform::F08,
    DmspPlatform::F11,
    DmspPlatform::F13,
    DmspPlatform::F17,
    DmspPlatform::F18,
];

/// File name for a day, e.g. `NSIDC0001_TB_PS_N25km_20191005_v6.0.nc`.
pub fn filename(date: NaiveDate, hemisphere: Hemisphere, resolution: DmspResolution) -> String {
    format!(
        "NSIDC0001_TB_PS_{}{}km_{}_v6.0.nc",
        hemisphere.initial(),
        resolution.as_str(),
        date.format("%Y%m%d")
    )
}

/// Path of the day's file inside `dir` (the daily subdirectory).
pub fn get_fp_on_disk(
    dir: &Path,
    date: NaiveDate,
    hemisphere: Hemisphere,
    resolution: DmspResolution,
) -> TbResult<PathBuf> {
    find_exactly_one(
        dir,
        &exact_name(&filename(date, hemisphere, resolution))?,
        Search::Shallow,
        &request_context(Product::Nsidc0001, date, hemisphere),
    )
}

/// Read and normalize one day of NSIDC-0001 Tbs for a platform.
#[instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn get_tbs_from_disk(
    date: NaiveDate,
    hemisphere: Hemisphere,
    data_dir: &Path,
    resolution: DmspResolution,
    platform: DmspPlatform,
) -> TbResult<TbDataset> {
    require_platform(Product::Nsidc0001, platform, PLATFORMS)?;

    let path = get_fp_on_disk(&data_dir.join(date_dir_name(date)), date, hemisphere, resolution)?;
    let fields = netcdf_parser::read_group_fields(&path, Some(platform.id()))?;
    let scheme = NamingScheme::nsidc_0001(platform.id())?;

    Ok(normalize_fields(fields, &scheme, Decoding::AlreadyDecoded, &path)?
        .with_source(Product::Nsidc0001.name(), resolution.km(), "km"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        let date = NaiveDate::from_ymd_opt(2019, 10, 5).unwrap();
        assert_eq!(
            filename(date, Hemisphere::North, DmspResolution::Km25),
            "NSIDC0001_TB_PS_N25km_20191005_v6.0.nc"
        );
        assert_eq!(
            filename(date, Hemisphere::South, DmspResolution::Km12_5),
            "NSIDC0001_TB_PS_S12.5km_20191005_v6.0.nc"
        );
    }

    #[test]
    fn test_unsupported_platform() {
        let date = NaiveDate::from_ymd_opt(2019, 10, 5).unwrap();
        let err = get_tbs_from_disk(
            date,
            Hemisphere::North,
            Path::new("/nonexistent"),
            DmspResolution::Km25,
            DmspPlatform::F16,
        )
        .unwrap_err();
        assert!(matches!(err, tb_common::TbError::UnsupportedProductVariant(_)));
    }
}
