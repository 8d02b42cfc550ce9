//! AU_SI12 / AU_SI25: AMSR2 daily polar gridded Tbs (HDF-EOS5).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tb_common::{Hemisphere, TbDataset, TbResult};
use tracing::instrument;

use super::{normalize_amsr_tbs, AmsrProduct, AmsrResolution};
use crate::locate::{anchored, date_dir_name, find_exactly_one, locate_with_fallback, Search};
use crate::products::{request_context, Product};

/// AU_SI12 file names as published by NSIDC and LANCE, e.g.
/// `AMSR_U2_L3_SeaIce12km_R04_20231003.he5`.
pub const AU_SI12_FILENAME_PATTERN: &str =
    r"AMSR_U2_L3_SeaIce12km_(?P<file_type>P|R)(?P<file_version>.*)_(?P<file_date>\d{8})\.he5";

/// Pattern matching any version of the day's file at `resolution`.
pub fn filename_pattern(date: NaiveDate, resolution: AmsrResolution) -> String {
    format!(
        r"AMSR_U2_L3_SeaIce{}km_.*_{}\.he5",
        resolution.as_str(),
        date.format("%Y%m%d")
    )
}

/// Group holding the gridded Tb fields for a hemisphere.
pub fn data_fields_group(hemisphere: Hemisphere, resolution: AmsrResolution) -> String {
    format!(
        "HDFEOS/GRIDS/{}pPolarGrid{}km/Data Fields",
        hemisphere.initial(),
        resolution.as_str()
    )
}

/// The single AU_SI file for `date` anywhere below `data_dir`.
pub fn get_au_si_fp_on_disk(
    data_dir: &Path,
    date: NaiveDate,
    resolution: AmsrResolution,
    context: &str,
) -> TbResult<PathBuf> {
    find_exactly_one(
        data_dir,
        &anchored(&filename_pattern(date, resolution))?,
        Search::Recursive,
        context,
    )
}

/// Read and normalize the Tbs of an AU_SI file.
#[instrument(skip(data_filepath), fields(path = %data_filepath.display()))]
pub fn get_au_si_tbs_from_disk(
    hemisphere: Hemisphere,
    resolution: AmsrResolution,
    data_filepath: &Path,
) -> TbResult<TbDataset> {
    let group = data_fields_group(hemisphere, resolution);
    let fields = netcdf_parser::read_group_fields(data_filepath, Some(&group))?;
    normalize_amsr_tbs(fields, resolution, hemisphere, AmsrProduct::AuSi, data_filepath)
}

/// Read a day of AU_SI Tbs from an NSIDC-style archive.
///
/// Looks in `data_dir/YYYY.MM.DD/` first, then anywhere below `data_dir`.
pub fn get_au_si_tbs(
    date: NaiveDate,
    hemisphere: Hemisphere,
    resolution: AmsrResolution,
    data_dir: &Path,
) -> TbResult<TbDataset> {
    let path = locate_with_fallback(
        data_dir,
        Path::new(&date_dir_name(date)),
        &anchored(&filename_pattern(date, resolution))?,
        &request_context(Product::AuSi, date, hemisphere),
    )?;

    Ok(get_au_si_tbs_from_disk(hemisphere, resolution, &path)?.with_source(
        Product::AuSi.name(),
        resolution.km(),
        "km",
    ))
}
