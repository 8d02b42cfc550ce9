//! Raw, product-specific fields as read from a data file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    Numbers(Vec<f64>),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Numbers(ns) => write!(f, "{:?}", ns),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

/// Field attributes keyed by name.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Raw values of a field, flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValues {
    /// Packed 16-bit integers, not yet scaled.
    Int16(Vec<i16>),
    /// Floating point values (already physical, or unpacked by the reader).
    Float64(Vec<f64>),
}

impl RawValues {
    pub fn len(&self) -> usize {
        match self {
            RawValues::Int16(v) => v.len(),
            RawValues::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short dtype label ("int16" or "float64").
    pub fn dtype(&self) -> &'static str {
        match self {
            RawValues::Int16(_) => "int16",
            RawValues::Float64(_) => "float64",
        }
    }
}

/// A named field with its native dimensions, before normalization.
#[derive(Debug, Clone)]
pub struct RawField {
    /// Product-specific variable name (e.g. `SI_25km_NH_06H_DAY`)
    pub name: String,
    /// Native dimension names (e.g. `["time", "y", "x"]`)
    pub dims: Vec<String>,
    /// Length of each dimension
    pub shape: Vec<usize>,
    pub values: RawValues,
    /// Storage type in the source file (e.g. "int16", "float32")
    pub dtype: String,
    pub attrs: Attributes,
    /// Whether CF packing (`scale_factor`, `add_offset`, `_FillValue`) was
    /// already applied by the reader.
    pub decoded: bool,
}

impl RawField {
    /// Field with `values` laid out as a 2-D `(rows, cols)` array.
    pub fn grid(name: impl Into<String>, rows: usize, cols: usize, values: RawValues) -> Self {
        let dtype = values.dtype().to_string();
        Self {
            name: name.into(),
            dims: vec!["y".to_string(), "x".to_string()],
            shape: vec![rows, cols],
            values,
            dtype,
            attrs: Attributes::new(),
            decoded: false,
        }
    }

    /// Field with explicit native dimensions, e.g. `["time", "y", "x"]`.
    pub fn with_dims(
        name: impl Into<String>,
        dims: &[(&str, usize)],
        values: RawValues,
    ) -> Self {
        let dtype = values.dtype().to_string();
        Self {
            name: name.into(),
            dims: dims.iter().map(|(d, _)| d.to_string()).collect(),
            shape: dims.iter().map(|(_, n)| *n).collect(),
            values,
            dtype,
            attrs: Attributes::new(),
            decoded: false,
        }
    }

    /// Attach an attribute, builder style.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Number of elements implied by `shape`.
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_field() {
        let field = RawField::grid("TB_F17_19H", 2, 3, RawValues::Int16(vec![0; 6]))
            .with_attr("units", "K");
        assert_eq!(field.shape, vec![2, 3]);
        assert_eq!(field.element_count(), 6);
        assert_eq!(field.values.dtype(), "int16");
        assert_eq!(field.dtype, "int16");
        assert!(!field.decoded);
        assert_eq!(field.attrs.get("units"), Some(&AttrValue::Text("K".to_string())));
    }

    #[test]
    fn test_with_dims() {
        let field = RawField::with_dims(
            "TB_F17_19H",
            &[("time", 1), ("y", 2), ("x", 2)],
            RawValues::Float64(vec![1.0; 4]),
        );
        assert_eq!(field.dims, vec!["time", "y", "x"]);
        assert_eq!(field.shape, vec![1, 2, 2]);
        assert_eq!(field.element_count(), field.values.len());
    }

    #[test]
    fn test_attr_display() {
        assert_eq!(AttrValue::from(1.5).to_string(), "1.5");
        assert_eq!(AttrValue::from("K").to_string(), "K");
    }
}
