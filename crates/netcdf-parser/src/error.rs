//! Error types for container reading.

use std::path::PathBuf;

use tb_common::TbError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF parsing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file could not be opened as netCDF/HDF5
    #[error("Failed to open {}: {message}", .path.display())]
    Open { path: PathBuf, message: String },

    /// Requested group is absent from the file
    #[error("Group `{group}` not found in {}", .path.display())]
    MissingGroup { path: PathBuf, group: String },

    /// Variable values could not be read
    #[error("Failed to read `{variable}` from {}: {message}", .path.display())]
    Read {
        path: PathBuf,
        variable: String,
        message: String,
    },
}

impl NetCdfError {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            NetCdfError::IoError(_) => None,
            NetCdfError::Open { path, .. }
            | NetCdfError::MissingGroup { path, .. }
            | NetCdfError::Read { path, .. } => Some(path),
        }
    }
}

impl From<NetCdfError> for TbError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::IoError(e) => TbError::Io(e),
            other => TbError::Container {
                path: other.path().cloned().unwrap_or_default(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_tb_error_keeps_path() {
        let err = NetCdfError::MissingGroup {
            path: PathBuf::from("/data/NSIDC0001_TB_PS_N25km_20191005_v6.0.nc"),
            group: "F17".to_string(),
        };
        let tb: TbError = err.into();
        match tb {
            TbError::Container { path, message } => {
                assert!(path.ends_with("NSIDC0001_TB_PS_N25km_20191005_v6.0.nc"));
                assert!(message.contains("F17"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
