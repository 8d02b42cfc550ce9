//! Error types for brightness-temperature access.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TbError.
pub type TbResult<T> = Result<T, TbError>;

/// Primary error type for locating, reading, normalizing and fetching Tbs.
#[derive(Debug, Error)]
pub enum TbError {
    // === Locating files ===
    #[error("No files matching `{pattern}` found in {} ({context})", .dir.display())]
    DataNotFound {
        pattern: String,
        dir: PathBuf,
        context: String,
    },

    #[error("Expected 1 match for `{pattern}` in {} ({context}), found {count}", .dir.display())]
    AmbiguousMatch {
        pattern: String,
        dir: PathBuf,
        context: String,
        count: usize,
    },

    // === Reading data ===
    #[error(
        "Malformed binary Tb file {}: {actual_bytes} bytes, expected {expected_bytes} for a {rows}x{cols} int16 grid",
        .path.display()
    )]
    MalformedBinaryFile {
        path: PathBuf,
        actual_bytes: usize,
        expected_bytes: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported product variant: {0}")]
    UnsupportedProductVariant(String),

    #[error("Field `{name}` has unexpected data type {found} (expected {expected})")]
    UnexpectedDataType {
        name: String,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid field `{name}`: {reason}")]
    InvalidField { name: String, reason: String },

    #[error("Grid shape mismatch for `{name}`: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Failed to read container {}: {message}", .path.display())]
    Container { path: PathBuf, message: String },

    // === Remote access ===
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Failed to fetch {granule}: {reason}")]
    RemoteFetchError { granule: String, reason: String },

    // === Infrastructure ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TbError {
    /// Whether this error reports that no data exists for the request.
    ///
    /// Used by callers that fall back to a wider search.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TbError::DataNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_embed_search_details() {
        let err = TbError::DataNotFound {
            pattern: "NSIDC0001_TB_PS_N25km_20191005_v6.0.nc".to_string(),
            dir: PathBuf::from("/data/2019.10.05"),
            context: "NSIDC-0001 2019-10-05 north".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("NSIDC0001_TB_PS_N25km_20191005_v6.0.nc"));
        assert!(msg.contains("/data/2019.10.05"));
        assert!(msg.contains("2019-10-05 north"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_ambiguous_is_not_not_found() {
        let err = TbError::AmbiguousMatch {
            pattern: "x".to_string(),
            dir: PathBuf::from("/data"),
            context: "test".to_string(),
            count: 2,
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("found 2"));
    }
}
