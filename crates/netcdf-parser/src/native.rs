//! Native container reading using the netcdf library.
//!
//! Opens netCDF-4 / HDF5 (HDF-EOS5) files directly through libnetcdf and
//! returns every readable variable of a group as a [`RawField`].
//!
//! # CF packing
//!
//! Variables carrying `scale_factor`, `add_offset`, `_FillValue` or
//! `missing_value` are unpacked to `f64` (fill cells become `NaN`) and marked
//! `decoded`; the packing attributes are dropped from the field's attributes.
//! Plain `int16` variables without packing attributes are returned raw so
//! product-specific decoding can apply.

use std::path::Path;
use std::sync::Once;

use tb_common::{AttrValue, Attributes, RawField, RawValues};
use tracing::{debug, instrument, warn};

use crate::error::{NetCdfError, NetCdfResult};

/// Attributes consumed by CF unpacking.
const PACKING_ATTRS: [&str; 4] = ["scale_factor", "add_offset", "_FillValue", "missing_value"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call multiple times; only the first call has an effect.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// How a variable's values are stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Int16,
    /// Any other numeric type, read as `f64`.
    Numeric,
    /// Strings, compounds, opaque and variable-length types.
    Unsupported,
}

impl Storage {
    /// Classify from the debug rendering of the variable type
    /// (e.g. `Int(I16)`, `Float(F32)`, `Char`).
    pub fn classify(vartype: &str) -> Self {
        const UNSUPPORTED: [&str; 6] = ["Char", "String", "Compound", "Opaque", "Vlen", "Enum"];
        if UNSUPPORTED.iter().any(|t| vartype.contains(t)) {
            Storage::Unsupported
        } else if vartype.contains("I16") {
            Storage::Int16
        } else {
            Storage::Numeric
        }
    }
}

/// CF packing attributes of a variable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CfPacking {
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl CfPacking {
    /// Whether any packing attribute is present.
    pub fn is_packed(&self) -> bool {
        self.scale_factor.is_some()
            || self.add_offset.is_some()
            || self.fill_value.is_some()
            || self.missing_value.is_some()
    }

    /// Unpack raw values: fill/missing cells become `NaN`, the rest
    /// `raw * scale_factor + add_offset`.
    pub fn apply(&self, raw: impl IntoIterator<Item = f64>) -> Vec<f64> {
        let scale = self.scale_factor.unwrap_or(1.0);
        let offset = self.add_offset.unwrap_or(0.0);
        raw.into_iter()
            .map(|v| {
                if v.is_nan() || Some(v) == self.fill_value || Some(v) == self.missing_value {
                    f64::NAN
                } else {
                    v * scale + offset
                }
            })
            .collect()
    }
}

/// Read the variables of `group` (a `/`-separated path such as
/// `HDFEOS/GRIDS/NpPolarGrid12km/Data Fields`), or of the root group when
/// `group` is `None`.
///
/// Variables whose type cannot be represented are logged and skipped.
#[instrument(skip_all, fields(path = %path.as_ref().display(), group = ?group))]
pub fn read_group_fields(path: impl AsRef<Path>, group: Option<&str>) -> NetCdfResult<Vec<RawField>> {
    let path = path.as_ref();
    silence_hdf5_errors();
    let file = open(path)?;

    let fields = match group {
        None => read_variables(path, file.variables())?,
        Some(name) => {
            let group = file
                .group(name)
                .map_err(|e| NetCdfError::Open {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?
                .ok_or_else(|| NetCdfError::MissingGroup {
                    path: path.to_path_buf(),
                    group: name.to_string(),
                })?;
            read_variables(path, group.variables())?
        }
    };

    debug!(count = fields.len(), "Read container fields");
    Ok(fields)
}

/// Read every variable in the file, descending into all groups.
///
/// Variable names are kept unqualified, as in a flattened view of the file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_all_fields(path: impl AsRef<Path>) -> NetCdfResult<Vec<RawField>> {
    let path = path.as_ref();
    silence_hdf5_errors();
    let file = open(path)?;

    let mut fields = read_variables(path, file.variables())?;
    let groups = file.groups().map_err(|e| NetCdfError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    for group in groups {
        read_group_tree(path, &group, &mut fields)?;
    }

    debug!(count = fields.len(), "Read container fields (all groups)");
    Ok(fields)
}

// =============================================================================
// Internal helpers
// =============================================================================

fn open(path: &Path) -> NetCdfResult<netcdf::File> {
    if !path.is_file() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    netcdf::open(path).map_err(|e| NetCdfError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_group_tree(path: &Path, group: &netcdf::Group, out: &mut Vec<RawField>) -> NetCdfResult<()> {
    out.extend(read_variables(path, group.variables())?);
    for child in group.groups() {
        read_group_tree(path, &child, out)?;
    }
    Ok(())
}

fn read_variables<'f>(
    path: &Path,
    vars: impl Iterator<Item = netcdf::Variable<'f>>,
) -> NetCdfResult<Vec<RawField>> {
    let mut fields = Vec::new();
    for var in vars {
        if let Some(field) = read_variable(path, &var)? {
            fields.push(field);
        }
    }
    Ok(fields)
}

fn read_variable(path: &Path, var: &netcdf::Variable) -> NetCdfResult<Option<RawField>> {
    let name = var.name().to_string();
    let vartype = format!("{:?}", var.vartype());
    let storage = Storage::classify(&vartype);

    if storage == Storage::Unsupported {
        warn!(variable = %name, vartype = %vartype, "Skipping variable with unsupported type");
        return Ok(None);
    }

    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name().to_string()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let packing = CfPacking {
        scale_factor: get_f64_attr(var, "scale_factor"),
        add_offset: get_f64_attr(var, "add_offset"),
        fill_value: get_f64_attr(var, "_FillValue"),
        missing_value: get_f64_attr(var, "missing_value"),
    };

    let read_err = |e: netcdf::Error| NetCdfError::Read {
        path: path.to_path_buf(),
        variable: name.clone(),
        message: e.to_string(),
    };

    let (values, dtype) = match storage {
        Storage::Int16 => {
            let raw: Vec<i16> = var.get_values::<i16, _>(..).map_err(read_err)?;
            if packing.is_packed() {
                (RawValues::Float64(packing.apply(raw.iter().map(|&v| v as f64))), "int16")
            } else {
                (RawValues::Int16(raw), "int16")
            }
        }
        _ => {
            let raw: Vec<f64> = var.get_values::<f64, _>(..).map_err(read_err)?;
            let values = if packing.is_packed() {
                packing.apply(raw)
            } else {
                raw
            };
            (RawValues::Float64(values), native_dtype(&vartype))
        }
    };

    let decoded = packing.is_packed();
    let attrs = read_attributes(var, decoded);

    Ok(Some(RawField {
        name,
        dims,
        shape,
        values,
        dtype: dtype.to_string(),
        attrs,
        decoded,
    }))
}

/// Short dtype label from the variable type's debug rendering.
fn native_dtype(vartype: &str) -> &'static str {
    match vartype {
        t if t.contains("F32") => "float32",
        t if t.contains("F64") => "float64",
        t if t.contains("U8") => "uint8",
        t if t.contains("I8") => "int8",
        t if t.contains("U16") => "uint16",
        t if t.contains("U32") => "uint32",
        t if t.contains("I32") => "int32",
        t if t.contains("U64") => "uint64",
        t if t.contains("I64") => "int64",
        _ => "unknown",
    }
}

fn read_attributes(var: &netcdf::Variable, drop_packing: bool) -> Attributes {
    let mut attrs = Attributes::new();
    for attr in var.attributes() {
        let name = attr.name().to_string();
        if drop_packing && PACKING_ATTRS.contains(&name.as_str()) {
            continue;
        }
        match attr.value() {
            Ok(value) => {
                if let Some(value) = convert_attribute(value) {
                    attrs.insert(name, value);
                }
            }
            Err(e) => debug!(attribute = %name, error = %e, "Skipping unreadable attribute"),
        }
    }
    attrs
}

/// Convert a netcdf attribute to an [`AttrValue`].
pub fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttrValue> {
    use netcdf::AttributeValue as A;

    let value = match value {
        A::Str(s) => AttrValue::Text(s),
        A::Strs(ss) => AttrValue::Text(ss.join(", ")),
        A::Uchar(v) => AttrValue::Number(v as f64),
        A::Schar(v) => AttrValue::Number(v as f64),
        A::Ushort(v) => AttrValue::Number(v as f64),
        A::Short(v) => AttrValue::Number(v as f64),
        A::Uint(v) => AttrValue::Number(v as f64),
        A::Int(v) => AttrValue::Number(v as f64),
        A::Ulonglong(v) => AttrValue::Number(v as f64),
        A::Longlong(v) => AttrValue::Number(v as f64),
        A::Float(v) => AttrValue::Number(v as f64),
        A::Double(v) => AttrValue::Number(v),
        A::Uchars(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Schars(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Ushorts(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Shorts(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Uints(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Ints(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Ulonglongs(v) => AttrValue::Numbers(v.into_iter().map(|x| x as f64).collect()),
        A::Longlongs(v) => AttrValue::Numbers(v.into_iter().map(|x| x as f64).collect()),
        A::Floats(v) => AttrValue::Numbers(v.into_iter().map(f64::from).collect()),
        A::Doubles(v) => AttrValue::Numbers(v),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(value)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get a numeric attribute as f64.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    match convert_attribute(attr_value)? {
        AttrValue::Number(n) => Some(n),
        AttrValue::Numbers(ns) => ns.first().copied(),
        AttrValue::Text(_) => None,
    }
}
