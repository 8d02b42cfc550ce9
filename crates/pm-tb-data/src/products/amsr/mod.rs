//! AMSR-E and AMSR2 sea-ice Tb products (AE_SI, AU_SI, LANCE NRT).

pub mod ae_si;
pub mod au_si;
pub mod lance;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tb_common::{Hemisphere, RawField, TbDataset, TbError, TbResult};

use crate::normalize::{normalize_fields, Decoding, NamingScheme};

/// AMSR product family, selecting how Tb values are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmsrProduct {
    /// AMSR2 (AU_SI12/AU_SI25)
    AuSi,
    /// AMSR-E (AE_SI12/AE_SI25)
    AeSi,
}

impl AmsrProduct {
    pub fn decoding(&self) -> Decoding {
        match self {
            // Packed with CF attributes, unpacked by the reader
            AmsrProduct::AuSi => Decoding::AlreadyDecoded,
            // int16 tenths of a Kelvin, no packing attributes, 0 = missing
            AmsrProduct::AeSi => Decoding::ScaledInt16 { divisor: 10.0 },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AmsrProduct::AuSi => "AU_SI",
            AmsrProduct::AeSi => "AE_SI",
        }
    }
}

impl fmt::Display for AmsrProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AmsrProduct {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AU_SI" => Ok(AmsrProduct::AuSi),
            "AE_SI" => Ok(AmsrProduct::AeSi),
            other => Err(TbError::UnsupportedProductVariant(format!(
                "unknown AMSR product `{}`",
                other
            ))),
        }
    }
}

/// AMSR grid resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmsrResolution {
    Km12,
    Km25,
}

impl AmsrResolution {
    /// Token used in file and variable names ("12" or "25").
    pub fn as_str(&self) -> &'static str {
        match self {
            AmsrResolution::Km12 => "12",
            AmsrResolution::Km25 => "25",
        }
    }

    pub fn km(&self) -> f64 {
        match self {
            AmsrResolution::Km12 => 12.5,
            AmsrResolution::Km25 => 25.0,
        }
    }
}

impl FromStr for AmsrResolution {
    type Err = TbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("km") {
            "12" | "12.5" => Ok(AmsrResolution::Km12),
            "25" => Ok(AmsrResolution::Km25),
            other => Err(TbError::UnsupportedProductVariant(format!(
                "unsupported AMSR resolution `{}` (expected 12 or 25)",
                other
            ))),
        }
    }
}

/// Keep the daily-average Tb fields and rename them, e.g.
/// `SI_25km_NH_06H_DAY` becomes `h06`.
pub fn normalize_amsr_tbs(
    fields: Vec<RawField>,
    resolution: AmsrResolution,
    hemisphere: Hemisphere,
    product: AmsrProduct,
    source: &Path,
) -> TbResult<TbDataset> {
    let scheme = NamingScheme::amsr(resolution.as_str(), hemisphere)?;
    normalize_fields(fields, &scheme, product.decoding(), source)
}
