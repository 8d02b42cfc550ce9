//! Two-dimensional brightness-temperature grids.

use serde::Serialize;

use crate::TbError;

/// Row-major 2-D grid of Kelvin values on the canonical `(y, x)` axes.
///
/// Missing or no-data cells are `NaN`.
#[derive(Debug, Clone, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Wrap row-major values. Fails if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, TbError> {
        if data.len() != rows * cols {
            return Err(TbError::InvalidField {
                name: "grid".to_string(),
                reason: format!(
                    "{} values cannot fill a {}x{} grid",
                    data.len(),
                    rows,
                    cols
                ),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Grid with every cell missing.
    pub fn missing(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![f64::NAN; rows * cols],
        }
    }

    /// Build from nested rows; all rows must have equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TbError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != n_cols) {
            return Err(TbError::InvalidField {
                name: "grid".to_string(),
                reason: "ragged rows".to_string(),
            });
        }
        Self::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Flat row-major values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn into_values(self) -> Vec<f64> {
        self.data
    }

    /// Iterate over rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0; an empty grid has no rows anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Number of non-missing cells.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Minimum and maximum of the non-missing cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Cell-wise equality treating `NaN == NaN`.
    pub fn nan_eq(&self, other: &Grid) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b)
    }
}
