//! On-disk archive fixtures.
//!
//! [`ArchiveDir`] builds a throwaway directory tree laid out like an NSIDC
//! archive so locators and readers can be exercised end to end.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::{create_tb_counts, encode_i16_le};

/// Temporary archive root, removed on drop.
pub struct ArchiveDir {
    dir: TempDir,
}

impl ArchiveDir {
    pub fn new() -> Self {
        Self {
            dir: crate::paths::temp_test_dir_with_prefix("tb_archive_"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: impl AsRef<Path>, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Create an empty file (for locator tests).
    pub fn touch(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.write_file(relative, b"")
    }

    /// Write a binary Tb grid of raw counts.
    pub fn write_binary_grid(&self, relative: impl AsRef<Path>, counts: &[i16]) -> PathBuf {
        self.write_file(relative, &encode_i16_le(counts))
    }

    /// Write a synthetic binary grid of `shape` (see [`create_tb_counts`]).
    pub fn write_synthetic_grid(
        &self,
        relative: impl AsRef<Path>,
        shape: (usize, usize),
        gap: usize,
    ) -> PathBuf {
        self.write_binary_grid(relative, &create_tb_counts(shape.0, shape.1, gap))
    }
}

impl Default for ArchiveDir {
    fn default() -> Self {
        Self::new()
    }
}
