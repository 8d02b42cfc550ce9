//! Reader for NSIDC flat binary Tb grids.
//!
//! Files hold exactly `rows * cols` little-endian `i16` values in tenths of a
//! Kelvin, row-major, with `0` marking missing data. Grid shape depends only
//! on the hemisphere (north 448x304, south 332x316).

use std::path::Path;

use tb_common::{Grid, Hemisphere, TbError, TbResult};
use tracing::{debug, instrument, warn};

/// Tenths of a Kelvin per raw count.
const KELVIN_PER_COUNT: f64 = 0.1;

/// How to treat a file whose byte length does not match the grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryReadMode {
    /// Fail with [`TbError::MalformedBinaryFile`].
    #[default]
    Strict,
    /// Log a warning and return a grid with every cell missing.
    Tolerant,
}

/// Read a binary Tb file from disk.
#[instrument(skip_all, fields(path = %path.as_ref().display(), hemisphere = %hemisphere))]
pub fn read_binary_tb_file(
    path: impl AsRef<Path>,
    hemisphere: Hemisphere,
    mode: BinaryReadMode,
) -> TbResult<Grid> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(bytes = bytes.len(), "Read binary Tb file");
    decode_binary_tbs(&bytes, hemisphere, path, mode)
}

/// Decode raw file contents into a Kelvin grid.
///
/// `source` is only used for error context.
pub fn decode_binary_tbs(
    bytes: &[u8],
    hemisphere: Hemisphere,
    source: &Path,
    mode: BinaryReadMode,
) -> TbResult<Grid> {
    let (rows, cols) = hemisphere.binary_grid_shape();
    let expected_bytes = 2 * rows * cols;

    if bytes.len() != expected_bytes {
        let err = TbError::MalformedBinaryFile {
            path: source.to_path_buf(),
            actual_bytes: bytes.len(),
            expected_bytes,
            rows,
            cols,
        };
        return match mode {
            BinaryReadMode::Strict => Err(err),
            BinaryReadMode::Tolerant => {
                warn!(error = %err, "Substituting an all-missing grid");
                Ok(Grid::missing(rows, cols))
            }
        };
    }

    let data: Vec<f64> = bytes
        .chunks_exact(2)
        .map(|pair| match i16::from_le_bytes([pair[0], pair[1]]) {
            0 => f64::NAN,
            raw => raw as f64 * KELVIN_PER_COUNT,
        })
        .collect();

    Grid::new(rows, cols, data)
}
