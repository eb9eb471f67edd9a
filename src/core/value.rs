// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Log value type system.
//!
//! [`TypeTag`] is the closed set of payload shapes a log entry can declare,
//! and [`LogValue`] holds one decoded sample of any of them. Type strings
//! that are not recognized map to [`TypeTag::Raw`] so their payloads survive
//! untouched.

use serde::{Deserialize, Serialize};

/// Payload shape declared by a start control record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Boolean,
    Int64,
    Float,
    Double,
    String,
    BooleanArray,
    Int64Array,
    FloatArray,
    DoubleArray,
    StringArray,
    /// Any byte length; used for every unrecognized type string
    Raw,
}

impl TypeTag {
    /// All tags, in declaration order.
    pub const ALL: [TypeTag; 11] = [
        TypeTag::Boolean,
        TypeTag::Int64,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::BooleanArray,
        TypeTag::Int64Array,
        TypeTag::FloatArray,
        TypeTag::DoubleArray,
        TypeTag::StringArray,
        TypeTag::Raw,
    ];

    /// Resolve a declared type string.
    ///
    /// Accepts both the on-disk spelling (`int64`, `int64[]`) and the topic
    /// tree spelling (`int`, `int[]`). `json` payloads are UTF-8 text and
    /// decode as strings. Anything else is raw.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "boolean" => TypeTag::Boolean,
            "int64" | "int" => TypeTag::Int64,
            "float" => TypeTag::Float,
            "double" => TypeTag::Double,
            "string" | "json" => TypeTag::String,
            "boolean[]" => TypeTag::BooleanArray,
            "int64[]" | "int[]" => TypeTag::Int64Array,
            "float[]" => TypeTag::FloatArray,
            "double[]" => TypeTag::DoubleArray,
            "string[]" => TypeTag::StringArray,
            _ => TypeTag::Raw,
        }
    }

    /// Type string written into start control records.
    pub fn wire_name(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::Int64 => "int64",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::String => "string",
            TypeTag::BooleanArray => "boolean[]",
            TypeTag::Int64Array => "int64[]",
            TypeTag::FloatArray => "float[]",
            TypeTag::DoubleArray => "double[]",
            TypeTag::StringArray => "string[]",
            TypeTag::Raw => "raw",
        }
    }

    /// Type string used by the in-memory topic tree.
    pub fn tree_name(&self) -> &'static str {
        match self {
            TypeTag::Int64 => "int",
            TypeTag::Int64Array => "int[]",
            other => other.wire_name(),
        }
    }

    /// Fixed payload size in bytes, or element size for fixed-width arrays.
    pub fn element_size(&self) -> Option<usize> {
        match self {
            TypeTag::Boolean | TypeTag::BooleanArray => Some(1),
            TypeTag::Int64 | TypeTag::Int64Array => Some(8),
            TypeTag::Float | TypeTag::FloatArray => Some(4),
            TypeTag::Double | TypeTag::DoubleArray => Some(8),
            TypeTag::String | TypeTag::StringArray | TypeTag::Raw => None,
        }
    }

    /// Check if this tag describes an array payload.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            TypeTag::BooleanArray
                | TypeTag::Int64Array
                | TypeTag::FloatArray
                | TypeTag::DoubleArray
                | TypeTag::StringArray
        )
    }
}

/// Map a declared on-disk type name to the topic tree spelling.
///
/// Only the 64-bit integer aliases are renamed; every other name, known or
/// not, passes through unchanged.
pub fn type_name_to_tree(name: &str) -> &str {
    match name {
        "int64" => "int",
        "int64[]" => "int[]",
        other => other,
    }
}

/// Inverse of [`type_name_to_tree`].
pub fn type_name_to_wire(name: &str) -> &str {
    match name {
        "int" => "int64",
        "int[]" => "int64[]",
        other => other,
    }
}

/// One decoded sample value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LogValue {
    Boolean(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    BooleanArray(Vec<bool>),
    IntArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    Raw(Vec<u8>),
}

impl LogValue {
    /// The tag whose payload shape this value encodes to.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            LogValue::Boolean(_) => TypeTag::Boolean,
            LogValue::Int(_) => TypeTag::Int64,
            LogValue::Float(_) => TypeTag::Float,
            LogValue::Double(_) => TypeTag::Double,
            LogValue::String(_) => TypeTag::String,
            LogValue::BooleanArray(_) => TypeTag::BooleanArray,
            LogValue::IntArray(_) => TypeTag::Int64Array,
            LogValue::FloatArray(_) => TypeTag::FloatArray,
            LogValue::DoubleArray(_) => TypeTag::DoubleArray,
            LogValue::StringArray(_) => TypeTag::StringArray,
            LogValue::Raw(_) => TypeTag::Raw,
        }
    }

    /// Compare two values, treating floats as equal only when their bit
    /// patterns match (so `NaN` equals an identical `NaN` and `0.0 != -0.0`).
    pub fn bit_eq(&self, other: &LogValue) -> bool {
        match (self, other) {
            (LogValue::Float(a), LogValue::Float(b)) => a.to_bits() == b.to_bits(),
            (LogValue::Double(a), LogValue::Double(b)) => a.to_bits() == b.to_bits(),
            (LogValue::FloatArray(a), LogValue::FloatArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (LogValue::DoubleArray(a), LogValue::DoubleArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (a, b) => a == b,
        }
    }

    /// Number of elements for arrays, 1 for scalars.
    pub fn len(&self) -> usize {
        match self {
            LogValue::BooleanArray(v) => v.len(),
            LogValue::IntArray(v) => v.len(),
            LogValue::FloatArray(v) => v.len(),
            LogValue::DoubleArray(v) => v.len(),
            LogValue::StringArray(v) => v.len(),
            _ => 1,
        }
    }

    /// Check if this is an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A timestamped value in a topic log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp in microseconds
    pub timestamp: u64,
    /// Sample value
    pub value: LogValue,
}

impl Sample {
    /// Create a new sample.
    pub fn new(timestamp: u64, value: LogValue) -> Self {
        Self { timestamp, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_from_name() {
        assert_eq!(TypeTag::from_type_name("boolean"), TypeTag::Boolean);
        assert_eq!(TypeTag::from_type_name("int64"), TypeTag::Int64);
        assert_eq!(TypeTag::from_type_name("int"), TypeTag::Int64);
        assert_eq!(TypeTag::from_type_name("int[]"), TypeTag::Int64Array);
        assert_eq!(TypeTag::from_type_name("json"), TypeTag::String);
        assert_eq!(TypeTag::from_type_name("msgpack"), TypeTag::Raw);
        assert_eq!(TypeTag::from_type_name("struct:Pose2d"), TypeTag::Raw);
    }

    #[test]
    fn test_type_tag_names_resolve_back() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_type_name(tag.wire_name()), tag);
            assert_eq!(TypeTag::from_type_name(tag.tree_name()), tag);
        }
    }

    #[test]
    fn test_type_name_aliasing() {
        assert_eq!(type_name_to_tree("int64"), "int");
        assert_eq!(type_name_to_tree("int64[]"), "int[]");
        assert_eq!(type_name_to_tree("json"), "json");
        assert_eq!(type_name_to_wire("int"), "int64");
        assert_eq!(type_name_to_wire("int[]"), "int64[]");
        assert_eq!(type_name_to_wire("double"), "double");
    }

    #[test]
    fn test_element_size() {
        assert_eq!(TypeTag::Boolean.element_size(), Some(1));
        assert_eq!(TypeTag::FloatArray.element_size(), Some(4));
        assert_eq!(TypeTag::Int64Array.element_size(), Some(8));
        assert_eq!(TypeTag::StringArray.element_size(), None);
    }

    #[test]
    fn test_bit_eq_floats() {
        let nan = LogValue::Double(f64::NAN);
        assert!(nan.bit_eq(&LogValue::Double(f64::NAN)));
        assert_ne!(nan, LogValue::Double(f64::NAN));
        assert!(!LogValue::Double(0.0).bit_eq(&LogValue::Double(-0.0)));
        assert!(LogValue::FloatArray(vec![1.5, f32::NAN])
            .bit_eq(&LogValue::FloatArray(vec![1.5, f32::NAN])));
        assert!(!LogValue::Int(1).bit_eq(&LogValue::Double(1.0)));
    }

    #[test]
    fn test_value_type_tag() {
        assert_eq!(LogValue::Int(3).type_tag(), TypeTag::Int64);
        assert_eq!(LogValue::Raw(vec![]).type_tag(), TypeTag::Raw);
        assert_eq!(
            LogValue::StringArray(vec!["a".into()]).type_tag(),
            TypeTag::StringArray
        );
    }

    #[test]
    fn test_value_serde_json() {
        let value = LogValue::IntArray(vec![1, 2, 3]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"type":"int_array","value":[1,2,3]}"#);
        let back: LogValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
