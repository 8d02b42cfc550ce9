//! Product-specific readers.
//!
//! Every reader follows the same path: locate file(s) for a date and
//! hemisphere, read raw fields (container or binary), normalize into a
//! [`TbDataset`].

pub mod amsr;
pub mod nsidc_0001;
pub mod nsidc_0007;
pub mod nsidc_0080;
pub mod nsidc_0802;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use tb_common::{AttrValue, Attributes, Hemisphere, TbDataset, TbError, TbResult};
use tracing::{debug, info, instrument};

use crate::binary::{read_binary_tb_file, BinaryReadMode};
use crate::config::DataDirsConfig;
use crate::normalize::NamingScheme;

pub use amsr::{AmsrProduct, AmsrResolution};

/// Supported data products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Nsidc0001,
    Nsidc0080,
    Nsidc0007,
    Nsidc0802,
    AuSi,
    AeSi,
    /// LANCE AMSR2 near-real-time AU_SI12 files
    Lance,
}

impl Product {
    /// Name used in dataset metadata and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Product::Nsidc0001 => "NSIDC-0001",
            Product::Nsidc0080 => "NSIDC-0080",
            Product::Nsidc0007 => "NSIDC-0007",
            Product::Nsidc0802 => "NSIDC-0802",
            Product::AuSi => "AU_SI",
            Product::AeSi => "AE_SI",
            Product::Lance => "LANCE_AMSR2",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Product {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "NSIDC_0001" | "0001" => Ok(Product::Nsidc0001),
            "NSIDC_0080" | "0080" => Ok(Product::Nsidc0080),
            "NSIDC_0007" | "0007" => Ok(Product::Nsidc0007),
            "NSIDC_0802" | "0802" => Ok(Product::Nsidc0802),
            "AU_SI" => Ok(Product::AuSi),
            "AE_SI" => Ok(Product::AeSi),
            "LANCE" | "LANCE_AMSR2" => Ok(Product::Lance),
            _ => Err(TbError::UnsupportedProductVariant(format!(
                "unknown product `{}`",
                s
            ))),
        }
    }
}

/// Grid resolution of the DMSP netCDF products (NSIDC-0001, NSIDC-0080).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmspResolution {
    Km25,
    Km12_5,
}

impl DmspResolution {
    /// Token used in filenames ("25" or "12.5").
    pub fn as_str(&self) -> &'static str {
        match self {
            DmspResolution::Km25 => "25",
            DmspResolution::Km12_5 => "12.5",
        }
    }

    pub fn km(&self) -> f64 {
        match self {
            DmspResolution::Km25 => 25.0,
            DmspResolution::Km12_5 => 12.5,
        }
    }
}

impl FromStr for DmspResolution {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("km") {
            "25" => Ok(DmspResolution::Km25),
            "12.5" => Ok(DmspResolution::Km12_5),
            other => Err(TbError::UnsupportedProductVariant(format!(
                "unsupported DMSP resolution `{}` (expected 25 or 12.5)",
                other
            ))),
        }
    }
}

/// DMSP satellite carrying the SSM/I or SSMIS radiometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmspPlatform {
    F08,
    F11,
    F13,
    F16,
    F17,
    F18,
}

impl DmspPlatform {
    /// Identifier used in group and variable names (e.g. "F17").
    pub fn id(&self) -> &'static str {
        match self {
            DmspPlatform::F08 => "F08",
            DmspPlatform::F11 => "F11",
            DmspPlatform::F13 => "F13",
            DmspPlatform::F16 => "F16",
            DmspPlatform::F17 => "F17",
            DmspPlatform::F18 => "F18",
        }
    }
}

impl fmt::Display for DmspPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DmspPlatform {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "F08" => Ok(DmspPlatform::F08),
            "F11" => Ok(DmspPlatform::F11),
            "F13" => Ok(DmspPlatform::F13),
            "F16" => Ok(DmspPlatform::F16),
            "F17" => Ok(DmspPlatform::F17),
            "F18" => Ok(DmspPlatform::F18),
            other => Err(TbError::UnsupportedProductVariant(format!(
                "unknown DMSP platform `{}`",
                other
            ))),
        }
    }
}

/// Check `platform` is one a product carries.
fn require_platform(
    product: Product,
    platform: DmspPlatform,
    supported: &[DmspPlatform],
) -> TbResult<()> {
    if supported.contains(&platform) {
        Ok(())
    } else {
        Err(TbError::UnsupportedProductVariant(format!(
            "{} has no data for platform {}",
            product, platform
        )))
    }
}

/// Human-readable description of a request, embedded in errors.
pub(crate) fn request_context(product: Product, date: NaiveDate, hemisphere: Hemisphere) -> String {
    format!("{} {} {}", product, date, hemisphere)
}

/// Read one binary grid per channel file and key each by `scheme`.
///
/// Each variable carries a `source_filename` attribute.
#[instrument(skip_all, fields(dir = %dir.display(), files = paths.len()))]
pub(crate) fn read_binary_channel_files(
    paths: &[PathBuf],
    scheme: &NamingScheme,
    hemisphere: Hemisphere,
    mode: BinaryReadMode,
    dir: &Path,
) -> TbResult<TbDataset> {
    let mut dataset = TbDataset::new();

    for path in paths {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let key = scheme.rename(&filename).ok_or_else(|| TbError::InvalidField {
            name: filename.clone(),
            reason: format!("file name does not match `{}`", scheme.as_str()),
        })?;

        let grid = read_binary_tb_file(path, hemisphere, mode)?;
        let mut attrs = Attributes::new();
        attrs.insert("source_filename".to_string(), AttrValue::Text(filename.clone()));

        if dataset.insert(key.clone(), grid, attrs)?.is_some() {
            return Err(TbError::AmbiguousMatch {
                pattern: scheme.as_str().to_string(),
                dir: dir.to_path_buf(),
                context: format!("several files map to {}", key),
                count: 2,
            });
        }
        debug!(file = %filename, channel = %key, "Read binary channel");
    }

    Ok(dataset)
}

/// Everything needed to read one day of one product.
#[derive(Debug, Clone)]
pub struct TbRequest {
    pub product: Product,
    pub date: NaiveDate,
    pub hemisphere: Hemisphere,
    /// Product resolution token ("25", "12.5", "12"); product default if unset
    pub resolution: Option<String>,
    /// Required for NSIDC-0001 and NSIDC-0080
    pub platform: Option<DmspPlatform>,
    pub binary_mode: BinaryReadMode,
}

impl TbRequest {
    pub fn new(product: Product, date: NaiveDate, hemisphere: Hemisphere) -> Self {
        Self {
            product,
            date,
            hemisphere,
            resolution: None,
            platform: None,
            binary_mode: BinaryReadMode::default(),
        }
    }

    fn dmsp_resolution(&self) -> TbResult<DmspResolution> {
        self.resolution
            .as_deref()
            .map_or(Ok(DmspResolution::Km25), str::parse)
    }

    fn amsr_resolution(&self) -> TbResult<AmsrResolution> {
        self.resolution
            .as_deref()
            .map_or(Ok(AmsrResolution::Km12), str::parse)
    }

    fn platform(&self) -> TbResult<DmspPlatform> {
        self.platform.ok_or_else(|| {
            TbError::UnsupportedProductVariant(format!("{} requires a platform", self.product))
        })
    }
}

/// Read the Tbs for `request` from the archive configured in `dirs`.
#[instrument(skip(dirs), fields(product = %request.product, date = %request.date, hemisphere = %request.hemisphere))]
pub fn read_tbs(request: &TbRequest, dirs: &DataDirsConfig) -> TbResult<TbDataset> {
    let hemisphere = request.hemisphere;
    let date = request.date;

    let dataset = match request.product {
        Product::Nsidc0001 => nsidc_0001::get_tbs_from_disk(
            date,
            hemisphere,
            dirs.dir_for(Product::Nsidc0001, AmsrResolution::Km12)?,
            request.dmsp_resolution()?,
            request.platform()?,
        )?,
        Product::Nsidc0080 => nsidc_0080::get_tbs_from_disk(
            date,
            hemisphere,
            dirs.dir_for(Product::Nsidc0080, AmsrResolution::Km12)?,
            request.dmsp_resolution()?,
            request.platform()?,
        )?,
        Product::Nsidc0007 => nsidc_0007::get_tbs_from_disk(
            date,
            hemisphere,
            dirs.dir_for(Product::Nsidc0007, AmsrResolution::Km25)?,
            request.binary_mode,
        )?,
        Product::Nsidc0802 => nsidc_0802::get_tbs_from_disk(
            date,
            hemisphere,
            dirs.dir_for(Product::Nsidc0802, AmsrResolution::Km12)?,
            request.binary_mode,
        )?,
        Product::AuSi => {
            let resolution = request.amsr_resolution()?;
            amsr::au_si::get_au_si_tbs(
                date,
                hemisphere,
                resolution,
                dirs.dir_for(Product::AuSi, resolution)?,
            )?
        }
        Product::AeSi => {
            let resolution = request.amsr_resolution()?;
            amsr::ae_si::get_tbs_from_disk(
                date,
                hemisphere,
                dirs.dir_for(Product::AeSi, resolution)?,
                resolution,
            )?
        }
        Product::Lance => amsr::lance::access_local_lance_data(
            date,
            dirs.dir_for(Product::Lance, AmsrResolution::Km12)?,
            hemisphere,
        )?,
    };

    info!(channels = dataset.len(), shape = ?dataset.shape(), "Read Tbs");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_parse() {
        assert_eq!("NSIDC-0001".parse::<Product>().unwrap(), Product::Nsidc0001);
        assert_eq!("au_si".parse::<Product>().unwrap(), Product::AuSi);
        assert_eq!("lance".parse::<Product>().unwrap(), Product::Lance);
        assert!(matches!(
            "NSIDC-9999".parse::<Product>(),
            Err(TbError::UnsupportedProductVariant(_))
        ));
    }

    #[test]
    fn test_dmsp_resolution_parse() {
        assert_eq!("25".parse::<DmspResolution>().unwrap(), DmspResolution::Km25);
        assert_eq!("12.5km".parse::<DmspResolution>().unwrap(), DmspResolution::Km12_5);
        assert!("12".parse::<DmspResolution>().is_err());
    }

    #[test]
    fn test_platform_parse_and_support() {
        let platform: DmspPlatform = "f17".parse().unwrap();
        assert_eq!(platform.id(), "F17");
        assert!("F19".parse::<DmspPlatform>().is_err());

        assert!(require_platform(Product::Nsidc0080, DmspPlatform::F08, nsidc_0080::PLATFORMS).is_err());
        assert!(require_platform(Product::Nsidc0001, DmspPlatform::F08, nsidc_0001::PLATFORMS).is_ok());
    }

    #[test]
    fn test_request_requires_platform_for_dmsp() {
        let date = NaiveDate::from_ymd_opt(2019, 10, 5).unwrap();
        let request = TbRequest::new(Product::Nsidc0001, date, Hemisphere::North);
        let err = read_tbs(&request, &DataDirsConfig::default()).unwrap_err();
        assert!(matches!(err, TbError::UnsupportedProductVariant(_)));
    }
}
