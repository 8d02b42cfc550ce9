//! Finds product files on local disk.
//!
//! Patterns are matched against file names only and must match the whole
//! name. Directory walks are deterministic: results are sorted by path.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use regex::Regex;
use tb_common::{TbError, TbResult};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How deep to look below the search directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// Only direct children of the directory.
    Shallow,
    /// The whole tree below the directory.
    Recursive,
}

/// Compile `pattern` anchored at both ends.
pub fn anchored(pattern: &str) -> TbResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| TbError::InvalidConfig(format!("bad filename pattern `{}`: {}", pattern, e)))
}

/// Pattern matching exactly one literal file name.
pub fn exact_name(name: &str) -> TbResult<Regex> {
    anchored(&regex::escape(name))
}

/// Daily subdirectory name used by NSIDC archives (`YYYY.MM.DD`).
pub fn date_dir_name(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// All files below `dir` whose name matches `pattern`, sorted.
///
/// A missing directory yields no files.
pub fn find_files(dir: &Path, pattern: &Regex, search: Search) -> Vec<PathBuf> {
    let max_depth = match search {
        Search::Shallow => 1,
        Search::Recursive => usize::MAX,
    };

    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(false, |name| pattern.is_match(name))
        })
        .map(|entry| entry.into_path())
        .collect();

    found.sort();
    debug!(
        dir = %dir.display(),
        pattern = %pattern.as_str(),
        count = found.len(),
        "Searched for files"
    );
    found
}

/// The single file matching `pattern`.
///
/// `context` describes the request (product, date, hemisphere) for errors.
pub fn find_exactly_one(
    dir: &Path,
    pattern: &Regex,
    search: Search,
    context: &str,
) -> TbResult<PathBuf> {
    let mut found = find_files(dir, pattern, search);
    match found.len() {
        0 => Err(not_found(dir, pattern, context)),
        1 => Ok(found.remove(0)),
        count => Err(TbError::AmbiguousMatch {
            pattern: pattern.as_str().to_string(),
            dir: dir.to_path_buf(),
            context: context.to_string(),
            count,
        }),
    }
}

/// One or more files matching `pattern`, e.g. one per channel.
pub fn find_one_per_channel(
    dir: &Path,
    pattern: &Regex,
    search: Search,
    context: &str,
) -> TbResult<Vec<PathBuf>> {
    let found = find_files(dir, pattern, search);
    if found.is_empty() {
        return Err(not_found(dir, pattern, context));
    }
    Ok(found)
}

/// Look for exactly one file in `expected_subdir` (relative to `data_dir`),
/// falling back to a recursive search of `data_dir` when nothing is there.
///
/// Only a miss triggers the fallback; several matches in the expected
/// directory are an error.
pub fn locate_with_fallback(
    data_dir: &Path,
    expected_subdir: &Path,
    pattern: &Regex,
    context: &str,
) -> TbResult<PathBuf> {
    let expected_dir = data_dir.join(expected_subdir);
    match find_exactly_one(&expected_dir, pattern, Search::Shallow, context) {
        Err(err) if err.is_not_found() => {
            warn!(
                expected_dir = %expected_dir.display(),
                data_dir = %data_dir.display(),
                "No data in expected directory, falling back to recursive search"
            );
            find_exactly_one(data_dir, pattern, Search::Recursive, context)
        }
        other => other,
    }
}

fn not_found(dir: &Path, pattern: &Regex, context: &str) -> TbError {
    TbError::DataNotFound {
        pattern: pattern.as_str().to_string(),
        dir: dir.to_path_buf(),
        context: context.to_string(),
    }
}
