//! Data directory configuration.
//!
//! Maps each product to the local directory holding its archive. Defaults
//! point at the NSIDC ECS mounts; a YAML file overrides any subset:
//!
//! ```yaml
//! nsidc_0001: /data/NSIDC-0001.006
//! au_si_12: /data/AU_SI12.001
//! lance: /data/lance_amsr2
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tb_common::{TbError, TbResult};
use tracing::debug;

use crate::products::{AmsrResolution, Product};

/// Product archive locations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataDirsConfig {
    pub nsidc_0001: PathBuf,
    pub nsidc_0080: PathBuf,
    pub nsidc_0007: PathBuf,
    /// No published archive yet
    pub nsidc_0802: Option<PathBuf>,
    pub au_si_12: PathBuf,
    pub au_si_25: PathBuf,
    pub ae_si_12: PathBuf,
    pub ae_si_25: PathBuf,
    /// Download directory of the LANCE fetcher
    pub lance: Option<PathBuf>,
}

impl Default for DataDirsConfig {
    fn default() -> Self {
        Self {
            nsidc_0001: PathBuf::from("/ecs/DP4/PM/NSIDC-0001.006/"),
            nsidc_0080: PathBuf::from("/ecs/DP1/PM/NSIDC-0080.002/"),
            nsidc_0007: PathBuf::from("/projects/DATASETS/nsidc0007_smmr_radiance_seaice_v01/"),
            nsidc_0802: None,
            au_si_12: PathBuf::from("/ecs/DP1/AMSA/AU_SI12.001/"),
            au_si_25: PathBuf::from("/ecs/DP1/AMSA/AU_SI25.001/"),
            ae_si_12: PathBuf::from("/ecs/DP4/AMSA/AE_SI12.003/"),
            ae_si_25: PathBuf::from("/ecs/DP4/AMSA/AE_SI25.003/"),
            lance: None,
        }
    }
}

impl DataDirsConfig {
    /// Load from a YAML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> TbResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TbError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            TbError::InvalidConfig(msg) => {
                TbError::InvalidConfig(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        debug!(path = %path.display(), "Loaded data directory config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> TbResult<Self> {
        serde_yaml::from_str(content).map_err(|e| TbError::InvalidConfig(e.to_string()))
    }

    /// Archive directory for `product`.
    ///
    /// `amsr_resolution` selects between the 12 and 25 km AMSR archives and
    /// is ignored for other products.
    pub fn dir_for(&self, product: Product, amsr_resolution: AmsrResolution) -> TbResult<&Path> {
        let dir = match (product, amsr_resolution) {
            (Product::Nsidc0001, _) => Some(&self.nsidc_0001),
            (Product::Nsidc0080, _) => Some(&self.nsidc_0080),
            (Product::Nsidc0007, _) => Some(&self.nsidc_0007),
            (Product::Nsidc0802, _) => self.nsidc_0802.as_ref(),
            (Product::AuSi, AmsrResolution::Km12) => Some(&self.au_si_12),
            (Product::AuSi, AmsrResolution::Km25) => Some(&self.au_si_25),
            (Product::AeSi, AmsrResolution::Km12) => Some(&self.ae_si_12),
            (Product::AeSi, AmsrResolution::Km25) => Some(&self.ae_si_25),
            (Product::Lance, _) => self.lance.as_ref(),
        };
        dir.map(PathBuf::as_path).ok_or_else(|| {
            TbError::InvalidConfig(format!("no data directory configured for {}", product))
        })
    }
}
