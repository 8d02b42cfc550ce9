//! Granule bookkeeping: filename parsing, per-day dedup and the NRT trust
//! filter.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use pm_tb_data::products::amsr::au_si::AU_SI12_FILENAME_PATTERN;
use regex::Regex;
use tb_common::{TbError, TbResult};
use tracing::{debug, warn};

use crate::catalog::CatalogEntry;

/// Processing state of a granule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileType {
    /// Partial day, still being filled
    Provisional,
    /// Complete day
    Final,
}

impl FileType {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "P" => Some(FileType::Provisional),
            "R" => Some(FileType::Final),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileType::Provisional => "P",
            FileType::Final => "R",
        })
    }
}

/// One day's granule, ready to download.
#[derive(Debug, Clone, PartialEq)]
pub struct GranuleInfo {
    pub file_type: FileType,
    pub file_version: String,
    pub filename: String,
    /// Download URLs in catalog order
    pub data_urls: Vec<String>,
}

pub type GranulesByDate = BTreeMap<NaiveDate, GranuleInfo>;

/// Parses AU_SI12 granule names.
pub struct GranuleParser {
    regex: Regex,
    expected_version: String,
}

impl GranuleParser {
    pub fn new(expected_version: &str) -> TbResult<Self> {
        let regex = Regex::new(&format!("^{}$", AU_SI12_FILENAME_PATTERN))
            .map_err(|e| TbError::InvalidConfig(format!("bad granule pattern: {}", e)))?;
        Ok(Self {
            regex,
            expected_version: expected_version.to_string(),
        })
    }

    /// Date and granule info for a catalog entry.
    ///
    /// A name that is not an AU_SI12 file is an error; an unexpected file
    /// version only warns.
    pub fn parse(&self, entry: &CatalogEntry) -> TbResult<(NaiveDate, GranuleInfo)> {
        let bad_name = |reason: &str| TbError::RemoteFetchError {
            granule: entry.native_id.clone(),
            reason: reason.to_string(),
        };

        let caps = self
            .regex
            .captures(&entry.native_id)
            .ok_or_else(|| bad_name("unexpected filename in catalog results"))?;

        let file_version = caps["file_version"].to_string();
        if file_version != self.expected_version {
            warn!(
                filename = %entry.native_id,
                expected = %self.expected_version,
                found = %file_version,
                "Unexpected file version, downloading anyway"
            );
        }

        let file_type = FileType::from_flag(&caps["file_type"])
            .ok_or_else(|| bad_name("unknown file type flag"))?;
        let date = NaiveDate::parse_from_str(&caps["file_date"], "%Y%m%d")
            .map_err(|e| bad_name(&format!("invalid file date: {}", e)))?;

        Ok((
            date,
            GranuleInfo {
                file_type,
                file_version,
                filename: entry.native_id.clone(),
                data_urls: entry.data_urls.clone(),
            },
        ))
    }

    /// Index catalog entries by date.
    ///
    /// For several entries on one date, a final granule beats a provisional
    /// one; otherwise the later entry wins.
    pub fn granules_by_date(&self, entries: &[CatalogEntry]) -> TbResult<GranulesByDate> {
        let mut by_date = GranulesByDate::new();
        for entry in entries {
            let (date, info) = self.parse(entry)?;
            match by_date.get(&date) {
                Some(existing) if existing.file_type > info.file_type => {
                    debug!(%date, kept = %existing.filename, dropped = %info.filename, "Duplicate date");
                }
                _ => {
                    by_date.insert(date, info);
                }
            }
        }
        Ok(by_date)
    }
}

/// Drop the most recent day unless it is a final granule.
pub fn filter_out_last_day(mut granules: GranulesByDate) -> GranulesByDate {
    let latest = granules
        .last_key_value()
        .map(|(date, info)| (*date, info.file_type));
    if let Some((date, FileType::Provisional)) = latest {
        debug!(%date, "Dropping provisional latest day");
        granules.remove(&date);
    }
    granules
}
