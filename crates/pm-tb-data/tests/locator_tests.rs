//! File locator tests over temporary archive trees.

use std::path::Path;

use pm_tb_data::locate::{anchored, exact_name};
use pm_tb_data::{find_one_per_channel, locate_with_fallback, Search, TbError};
use test_utils::ArchiveDir;

const AU_SI_PATTERN: &str = r"AMSR_U2_L3_SeaIce12km_.*_20220301\.he5";

// ============================================================================
// Fallback search
// ============================================================================

#[test]
fn test_file_in_expected_dir() {
    let archive = ArchiveDir::new();
    archive.touch("2022.03.01/AMSR_U2_L3_SeaIce12km_B04_20220301.he5");

    let found = locate_with_fallback(
        archive.path(),
        Path::new("2022.03.01"),
        &anchored(AU_SI_PATTERN).unwrap(),
        "AU_SI 2022-03-01 north",
    )
    .unwrap();
    assert!(found.ends_with("2022.03.01/AMSR_U2_L3_SeaIce12km_B04_20220301.he5"));
}

#[test]
fn test_fallback_to_recursive_search() {
    let archive = ArchiveDir::new();
    archive.touch("misplaced/deeper/AMSR_U2_L3_SeaIce12km_B04_20220301.he5");

    let found = locate_with_fallback(
        archive.path(),
        Path::new("2022.03.01"),
        &anchored(AU_SI_PATTERN).unwrap(),
        "AU_SI 2022-03-01 north",
    )
    .unwrap();
    assert!(found.ends_with("misplaced/deeper/AMSR_U2_L3_SeaIce12km_B04_20220301.he5"));
}

#[test]
fn test_fallback_still_ambiguous() {
    let archive = ArchiveDir::new();
    archive.touch("a/AMSR_U2_L3_SeaIce12km_B04_20220301.he5");
    archive.touch("b/AMSR_U2_L3_SeaIce12km_B04_20220301.he5");

    let err = locate_with_fallback(
        archive.path(),
        Path::new("2022.03.01"),
        &anchored(AU_SI_PATTERN).unwrap(),
        "AU_SI 2022-03-01 north",
    )
    .unwrap_err();
    assert!(matches!(err, TbError::AmbiguousMatch { count: 2, .. }));
}

#[test]
fn test_ambiguous_expected_dir_is_not_retried() {
    let archive = ArchiveDir::new();
    archive.touch("2022.03.01/AMSR_U2_L3_SeaIce12km_P04_20220301.he5");
    archive.touch("2022.03.01/AMSR_U2_L3_SeaIce12km_R04_20220301.he5");

    let err = locate_with_fallback(
        archive.path(),
        Path::new("2022.03.01"),
        &anchored(AU_SI_PATTERN).unwrap(),
        "AU_SI 2022-03-01 north",
    )
    .unwrap_err();
    match err {
        TbError::AmbiguousMatch { dir, count, .. } => {
            assert_eq!(count, 2);
            assert!(dir.ends_with("2022.03.01"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_nothing_anywhere() {
    let archive = ArchiveDir::new();
    let err = locate_with_fallback(
        archive.path(),
        Path::new("2022.03.01"),
        &anchored(AU_SI_PATTERN).unwrap(),
        "AU_SI 2022-03-01 north",
    )
    .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("AU_SI 2022-03-01 north"));
}

// ============================================================================
// Per-channel search
// ============================================================================

#[test]
fn test_one_per_channel_sorted() {
    let archive = ArchiveDir::new();
    archive.touch("850804S.37H");
    archive.touch("850804S.18V");
    archive.touch("850804N.18V");

    let found = find_one_per_channel(
        archive.path(),
        &anchored(r"850804S\.\d{2}[HV]").unwrap(),
        Search::Shallow,
        "NSIDC-0007",
    )
    .unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["850804S.18V", "850804S.37H"]);
}

#[test]
fn test_partial_download_not_matched() {
    let archive = ArchiveDir::new();
    archive.touch(".AMSR_U2_L3_SeaIce12km_R04_20220301.he5.partial");

    let err = find_one_per_channel(
        archive.path(),
        &exact_name("AMSR_U2_L3_SeaIce12km_R04_20220301.he5").unwrap(),
        Search::Recursive,
        "LANCE",
    )
    .unwrap_err();
    assert!(err.is_not_found());
}
