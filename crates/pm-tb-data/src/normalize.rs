//! Renames product-specific fields to canonical channel keys.
//!
//! Each product names its Tb fields differently (`TB_F17_19H`,
//! `SI_25km_NH_06H_DAY`, `850804S.37H`). A [`NamingScheme`] recognises the
//! fields of one product and extracts the channel and polarization; fields
//! that don't match are dropped.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use tb_common::{
    ChannelKey, Grid, Hemisphere, RawField, RawValues, TbDataset, TbError, TbResult,
};
use tracing::debug;

/// Compiled, fully anchored field-name pattern with `channel` and
/// `polarization` capture groups.
#[derive(Debug, Clone)]
pub struct NamingScheme {
    regex: Regex,
}

impl NamingScheme {
    /// Build from an unanchored pattern body. The pattern must define the
    /// named groups `channel` and `polarization`.
    pub fn new(pattern: &str) -> TbResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| TbError::InvalidConfig(format!("bad naming pattern: {}", e)))?;

        let names: Vec<&str> = regex.capture_names().flatten().collect();
        for group in ["channel", "polarization"] {
            if !names.contains(&group) {
                return Err(TbError::InvalidConfig(format!(
                    "naming pattern `{}` lacks a `{}` group",
                    pattern, group
                )));
            }
        }
        Ok(Self { regex })
    }

    /// NSIDC-0001 fields: `TB_{platform}_{cc}{H|V}`.
    pub fn nsidc_0001(platform: &str) -> TbResult<Self> {
        Self::new(&format!(
            r"TB_{}_(?P<channel>\d{{2}})(?P<polarization>H|V)",
            regex::escape(platform)
        ))
    }

    /// NSIDC-0080 fields: `TB_{platform}_{N|S}H_{cc}{H|V}`.
    pub fn nsidc_0080(hemisphere: Hemisphere, platform: &str) -> TbResult<Self> {
        Self::new(&format!(
            r"TB_{}_{}_(?P<channel>\d{{2}})(?P<polarization>H|V)",
            regex::escape(platform),
            hemisphere.short_name()
        ))
    }

    /// AU_SI / AE_SI daily-average fields: `SI_{res}km_{N|S}H_{cc}{H|V}_DAY`.
    pub fn amsr(resolution: &str, hemisphere: Hemisphere) -> TbResult<Self> {
        Self::new(&format!(
            r"SI_{}km_{}_(?P<channel>\d{{2}})(?P<polarization>H|V)_DAY",
            regex::escape(resolution),
            hemisphere.short_name()
        ))
    }

    /// NSIDC-0007 per-channel files: `{yymmdd}{N|S}.{cc}{H|V}`.
    pub fn nsidc_0007_file(date: NaiveDate, hemisphere: Hemisphere) -> TbResult<Self> {
        Self::new(&format!(
            r"{}{}\.(?P<channel>\d{{2}})(?P<polarization>H|V)",
            date.format("%y%m%d"),
            hemisphere.initial()
        ))
    }

    /// NSIDC-0802 per-channel files: `tb_as2_{YYYYMMDD}_nrt_{n|s}{cc}{h|v}.bin`.
    pub fn nsidc_0802_file(date: NaiveDate, hemisphere: Hemisphere) -> TbResult<Self> {
        Self::new(&format!(
            r"tb_as2_{}_nrt_{}(?P<channel>\d{{2}})(?P<polarization>h|v)\.bin",
            date.format("%Y%m%d"),
            hemisphere.initial_lower()
        ))
    }

    /// Canonical key for `name`, or `None` if the name is not a Tb field of
    /// this product.
    pub fn rename(&self, name: &str) -> Option<ChannelKey> {
        let caps = self.regex.captures(name)?;
        ChannelKey::from_parts(&caps["channel"], &caps["polarization"]).ok()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// How raw values become Kelvin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoding {
    /// Values are already physical (or were unpacked by the reader).
    AlreadyDecoded,
    /// Raw `int16` counts: `v / divisor`, `0` is missing.
    ScaledInt16 { divisor: f64 },
}

impl Decoding {
    /// Decode a field's values to Kelvin.
    pub fn apply(&self, field: &RawField) -> TbResult<Vec<f64>> {
        match (self, &field.values) {
            (Decoding::AlreadyDecoded, RawValues::Float64(v)) => Ok(v.clone()),
            (Decoding::AlreadyDecoded, RawValues::Int16(v)) => {
                Ok(v.iter().map(|&x| x as f64).collect())
            }
            (Decoding::ScaledInt16 { divisor }, RawValues::Int16(v)) => Ok(v
                .iter()
                .map(|&x| if x == 0 { f64::NAN } else { x as f64 / divisor })
                .collect()),
            (Decoding::ScaledInt16 { .. }, RawValues::Float64(_)) => {
                Err(TbError::UnexpectedDataType {
                    name: field.name.clone(),
                    expected: "int16",
                    found: field.dtype.clone(),
                })
            }
        }
    }
}

/// Reduce a field to the canonical `(y, x)` layout.
///
/// Leading axes beyond the last two are indexed at 0, one-dimensional
/// fields become a single row.
pub fn canonical_grid(field: &RawField, values: Vec<f64>) -> TbResult<Grid> {
    let invalid = |reason: String| TbError::InvalidField {
        name: field.name.clone(),
        reason,
    };

    let (rows, cols) = match field.shape.as_slice() {
        [] => return Err(invalid("field has no dimensions".to_string())),
        [n] => (1, *n),
        [.., rows, cols] => (*rows, *cols),
    };

    let expected: usize = field.shape.iter().product();
    if values.len() != expected {
        return Err(invalid(format!(
            "{} values do not fill shape {:?}",
            values.len(),
            field.shape
        )));
    }
    if expected == 0 && rows * cols != 0 {
        return Err(invalid(format!("empty leading axis in shape {:?}", field.shape)));
    }

    let mut values = values;
    values.truncate(rows * cols);
    Grid::new(rows, cols, values)
}

/// Normalize raw fields into a dataset keyed by canonical channel.
///
/// Fields that don't match `scheme` are dropped. `source` names the file or
/// directory the fields came from and is used for error context.
pub fn normalize_fields(
    fields: Vec<RawField>,
    scheme: &NamingScheme,
    decoding: Decoding,
    source: &Path,
) -> TbResult<TbDataset> {
    let mut origin: BTreeMap<ChannelKey, String> = BTreeMap::new();
    let mut dataset = TbDataset::new();

    for field in fields {
        let Some(key) = scheme.rename(&field.name) else {
            debug!(field = %field.name, "Dropping non-Tb field");
            continue;
        };

        if let Some(previous) = origin.get(&key) {
            return Err(TbError::AmbiguousMatch {
                pattern: scheme.as_str().to_string(),
                dir: source.to_path_buf(),
                context: format!("`{}` and `{}` both map to {}", previous, field.name, key),
                count: 2,
            });
        }

        let values = decoding.apply(&field)?;
        let grid = canonical_grid(&field, values)?;
        debug!(field = %field.name, channel = %key, "Normalized field");
        origin.insert(key.clone(), field.name.clone());
        dataset.insert(key, grid, field.attrs)?;
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_common::AttrValue;

    fn key(s: &str) -> ChannelKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_rename_nsidc_0001() {
        let scheme = NamingScheme::nsidc_0001("F17").unwrap();
        assert_eq!(scheme.rename("TB_F17_19H"), Some(key("h19")));
        assert_eq!(scheme.rename("TB_F17_37V"), Some(key("v37")));
        assert_eq!(scheme.rename("TB_F18_19H"), None);
        assert_eq!(scheme.rename("TB_F17_19H_extra"), None);
        assert_eq!(scheme.rename("h19"), None);
    }

    #[test]
    fn test_rename_nsidc_0080() {
        let scheme = NamingScheme::nsidc_0080(Hemisphere::South, "F18").unwrap();
        assert_eq!(scheme.rename("TB_F18_SH_91V"), Some(key("v91")));
        assert_eq!(scheme.rename("TB_F18_NH_91V"), None);
    }

    #[test]
    fn test_rename_amsr() {
        let scheme = NamingScheme::amsr("25", Hemisphere::North).unwrap();
        assert_eq!(scheme.rename("SI_25km_NH_06H_DAY"), Some(key("h06")));
        assert_eq!(scheme.rename("SI_25km_NH_89V_DAY"), Some(key("v89")));
        assert_eq!(scheme.rename("SI_25km_NH_89V_ASC"), None);
        assert_eq!(scheme.rename("SI_12km_NH_89V_DAY"), None);
    }

    #[test]
    fn test_rename_binary_files() {
        let date = NaiveDate::from_ymd_opt(1985, 8, 4).unwrap();
        let scheme = NamingScheme::nsidc_0007_file(date, Hemisphere::South).unwrap();
        assert_eq!(scheme.rename("850804S.37H"), Some(key("h37")));
        assert_eq!(scheme.rename("850804N.37H"), None);

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let scheme = NamingScheme::nsidc_0802_file(date, Hemisphere::North).unwrap();
        assert_eq!(scheme.rename("tb_as2_20250101_nrt_n19h.bin"), Some(key("h19")));
        assert_eq!(scheme.rename("tb_as2_20250101_nrt_s19h.bin"), None);
        assert_eq!(scheme.rename("tb_as2_20250101_nrt_n19hXbin"), None);
    }

    #[test]
    fn test_scheme_requires_named_groups() {
        assert!(NamingScheme::new(r"TB_(?P<channel>\d{2})").is_err());
        assert!(NamingScheme::new(r"TB_(?P<channel>\d{2})(?P<polarization>H|V)").is_ok());
    }

    #[test]
    fn test_scaled_int16_decoding() {
        let field = RawField::grid("SI_12km_NH_18H_DAY", 1, 3, RawValues::Int16(vec![0, 10, -5]));
        let out = Decoding::ScaledInt16 { divisor: 10.0 }.apply(&field).unwrap();
        assert!(out[0].is_nan());
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], -0.5);
    }

    #[test]
    fn test_scaled_int16_rejects_float_data() {
        let field = RawField::grid("SI_12km_NH_18H_DAY", 1, 1, RawValues::Float64(vec![1.0]));
        let err = Decoding::ScaledInt16 { divisor: 10.0 }
            .apply(&field)
            .unwrap_err();
        assert!(matches!(err, TbError::UnexpectedDataType { .. }));
    }

    #[test]
    fn test_canonical_grid_drops_time_axis() {
        let field = RawField::with_dims(
            "TB_F17_19H",
            &[("time", 1), ("y", 2), ("x", 2)],
            RawValues::Float64(vec![1.0, 2.0, 3.0, 4.0]),
        );
        let grid = canonical_grid(&field, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(grid.get(1, 1), Some(4.0));
    }

    #[test]
    fn test_canonical_grid_takes_first_leading_index() {
        let field = RawField::with_dims(
            "TB_F17_19H",
            &[("time", 2), ("y", 1), ("x", 2)],
            RawValues::Float64(vec![1.0, 2.0, 3.0, 4.0]),
        );
        let grid = canonical_grid(&field, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_canonical_grid_edge_shapes() {
        let field = RawField::with_dims("v", &[("x", 3)], RawValues::Float64(vec![1.0; 3]));
        assert_eq!(canonical_grid(&field, vec![1.0; 3]).unwrap().shape(), (1, 3));

        let field = RawField::with_dims("v", &[], RawValues::Float64(vec![1.0]));
        assert!(matches!(
            canonical_grid(&field, vec![1.0]),
            Err(TbError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_normalize_filters_and_keeps_attrs() {
        let scheme = NamingScheme::nsidc_0001("F17").unwrap();
        let fields = vec![
            RawField::grid("TB_F17_19H", 1, 2, RawValues::Float64(vec![150.0, 151.0]))
                .with_attr("units", "K"),
            RawField::grid("crs", 1, 2, RawValues::Float64(vec![0.0, 0.0])),
            RawField::grid("TB_F17_37V", 1, 2, RawValues::Float64(vec![200.0, 201.0])),
        ];
        let ds = normalize_fields(fields, &scheme, Decoding::AlreadyDecoded, Path::new("f.nc"))
            .unwrap();

        let keys: Vec<String> = ds.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["h19", "v37"]);
        assert_eq!(
            ds.channel("h19").unwrap().attrs.get("units"),
            Some(&AttrValue::Text("K".to_string()))
        );
    }

    #[test]
    fn test_normalize_duplicate_channel_is_ambiguous() {
        let scheme = NamingScheme::new(r"TB_F1[78]_(?P<channel>\d{2})(?P<polarization>H|V)")
            .unwrap();
        let fields = vec![
            RawField::grid("TB_F17_19H", 1, 1, RawValues::Float64(vec![1.0])),
            RawField::grid("TB_F18_19H", 1, 1, RawValues::Float64(vec![2.0])),
        ];
        let err = normalize_fields(fields, &scheme, Decoding::AlreadyDecoded, Path::new("f.nc"))
            .unwrap_err();
        assert!(matches!(err, TbError::AmbiguousMatch { count: 2, .. }));
    }

    #[test]
    fn test_renormalizing_canonical_names_is_empty() {
        let scheme = NamingScheme::amsr("25", Hemisphere::North).unwrap();
        let fields = vec![RawField::grid("h06", 1, 1, RawValues::Float64(vec![1.0]))];
        let ds = normalize_fields(fields, &scheme, Decoding::AlreadyDecoded, Path::new("f.nc"))
            .unwrap();
        assert!(ds.is_empty());
    }
}
