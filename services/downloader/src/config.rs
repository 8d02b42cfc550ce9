//! Fetcher configuration.
//!
//! Defaults target the LANCE AMSR2 AU_SI12 NRT collection in NASA CMR. A
//! YAML file may override any field:
//!
//! ```yaml
//! short_name: AU_SI12_NRT_R04
//! timeout_secs: 60
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tb_common::{TbError, TbResult};
use tracing::debug;

/// Settings for catalog search, login and downloads.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetcherConfig {
    /// CMR search endpoint root
    pub cmr_url: String,
    /// CMR collection short name
    pub short_name: String,
    pub page_size: u32,
    /// File version expected in granule names; others are kept with a warning
    pub expected_file_version: String,
    /// Redirects to this host mean Earthdata Login is required
    pub login_host: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cmr_url: "https://cmr.earthdata.nasa.gov".to_string(),
            short_name: "AU_SI12_NRT_R04".to_string(),
            // LANCE keeps about two weeks of granules
            page_size: 100,
            expected_file_version: "04".to_string(),
            login_host: "urs.earthdata.nasa.gov".to_string(),
            timeout_secs: 30,
            user_agent: "pm_tb_data".to_string(),
        }
    }
}

impl FetcherConfig {
    /// Load from a YAML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> TbResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TbError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| TbError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), short_name = %config.short_name, "Loaded fetcher config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.short_name, "AU_SI12_NRT_R04");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.user_agent, "pm_tb_data");
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs: 5\nexpected_file_version: \"05\"").unwrap();

        let config = FetcherConfig::load(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.expected_file_version, "05");
        assert_eq!(config.cmr_url, "https://cmr.earthdata.nasa.gov");
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "provider: LANCEAMSR2").unwrap();

        let err = FetcherConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, TbError::InvalidConfig(_)));
    }
}
