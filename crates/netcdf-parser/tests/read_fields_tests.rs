//! Reads small netCDF files written on the fly.

use netcdf_parser::{read_all_fields, read_group_fields, NetCdfError};
use tb_common::{AttrValue, RawValues};
use tempfile::TempDir;

fn write_grouped_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("NSIDC0001_TB_PS_N25km_20191005_v6.0.nc");
    let mut file = netcdf::create(&path).unwrap();

    let mut group = file.add_group("F17").unwrap();
    group.add_dimension("time", 1).unwrap();
    group.add_dimension("y", 2).unwrap();
    group.add_dimension("x", 3).unwrap();

    let mut packed = group
        .add_variable::<i16>("TB_F17_19H", &["time", "y", "x"])
        .unwrap();
    // Fill value must be defined before any data is written
    packed.put_attribute("_FillValue", 0i16).unwrap();
    packed.put_attribute("scale_factor", 0.1f64).unwrap();
    packed.put_attribute("units", "K").unwrap();
    packed
        .put_values(&[0i16, 1500, 1510, 1520, 1530, 1540], ..)
        .unwrap();

    let mut raw = group.add_variable::<i16>("TB_F17_37V", &["y", "x"]).unwrap();
    raw.put_values(&[10i16, 20, 30, 40, 50, 60], ..).unwrap();

    path
}

// ============================================================================
// Group reads
// ============================================================================

#[test]
fn test_read_group_decodes_packed_variables() {
    let dir = TempDir::new().unwrap();
    let path = write_grouped_file(&dir);

    let fields = read_group_fields(&path, Some("F17")).unwrap();
    let tb = fields.iter().find(|f| f.name == "TB_F17_19H").unwrap();

    assert!(tb.decoded);
    assert_eq!(tb.dims, vec!["time", "y", "x"]);
    assert_eq!(tb.shape, vec![1, 2, 3]);
    assert_eq!(tb.attrs.get("units"), Some(&AttrValue::Text("K".to_string())));
    assert!(!tb.attrs.contains_key("scale_factor"));

    match &tb.values {
        RawValues::Float64(v) => {
            assert!(v[0].is_nan());
            assert!((v[1] - 150.0).abs() < 1e-9);
        }
        other => panic!("expected decoded values, got {:?}", other),
    }
}

#[test]
fn test_read_group_keeps_unpacked_int16_raw() {
    let dir = TempDir::new().unwrap();
    let path = write_grouped_file(&dir);

    let fields = read_group_fields(&path, Some("F17")).unwrap();
    let tb = fields.iter().find(|f| f.name == "TB_F17_37V").unwrap();

    assert!(!tb.decoded);
    assert_eq!(tb.dtype, "int16");
    assert_eq!(tb.values, RawValues::Int16(vec![10, 20, 30, 40, 50, 60]));
}

#[test]
fn test_missing_group() {
    let dir = TempDir::new().unwrap();
    let path = write_grouped_file(&dir);

    let err = read_group_fields(&path, Some("F18")).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingGroup { .. }));
}

// ============================================================================
// Flattened reads
// ============================================================================

#[test]
fn test_read_all_fields_flattens_groups() {
    let dir = TempDir::new().unwrap();
    let path = write_grouped_file(&dir);

    let fields = read_all_fields(&path).unwrap();
    let mut names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["TB_F17_19H", "TB_F17_37V"]);

    // Root group has no variables of its own
    assert!(read_group_fields(&path, None).unwrap().is_empty());
}
