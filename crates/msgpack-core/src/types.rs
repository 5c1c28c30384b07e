//! The value tree shared by the JSON and MessagePack sides of the codec.
//!
//! JSON numbers carry no integer/float distinction, while MessagePack has
//! signed, unsigned and floating-point families. `Value` fixes the numeric
//! kind when the tree is built, so the encoder never has to inspect a number
//! to decide how to treat it.

use std::collections::BTreeMap;

use serde_json::Number;

use crate::error::{MsgPackError, Result};

/// Map payload. Keys are unique and iterate in byte-wise lexicographic order,
/// which is also the order the encoder writes them on the wire.
pub type Map = BTreeMap<String, Value>;

/// A JSON-shaped value with MessagePack's numeric kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    UnsignedInteger(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(Map),
}

/// Exclusive upper bound of `i64` as an `f64` (2^63).
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;
/// Exclusive upper bound of `u64` as an `f64` (2^64).
const U64_UPPER: f64 = 18_446_744_073_709_551_616.0;

/// Returns the `i64` a float denotes when it has no fractional part and lies
/// in `[-2^63, 2^63)`. `as` saturates, so the range is checked explicitly.
pub(crate) fn float_as_exact_i64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= -I64_UPPER && f < I64_UPPER {
        Some(f as i64)
    } else {
        None
    }
}

fn float_as_exact_u64(f: f64) -> Option<u64> {
    if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < U64_UPPER {
        Some(f as u64)
    } else {
        None
    }
}

impl Value {
    /// Build a value tree from parsed JSON.
    ///
    /// Integers that fit `i64` become [`Value::Integer`], larger non-negative
    /// integers [`Value::UnsignedInteger`], and everything else
    /// [`Value::Float`].
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::from_number(n),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(arr) => Value::Array(arr.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    fn from_number(n: &Number) -> Value {
        if let Some(i) = n.as_i64() {
            Value::Integer(i)
        } else if let Some(u) = n.as_u64() {
            Value::UnsignedInteger(u)
        } else {
            // Without serde_json's arbitrary_precision feature every number is
            // an i64, a u64 or an f64.
            n.as_f64().map_or(Value::Null, Value::Float)
        }
    }

    /// Convert into a `serde_json::Value` for writing JSON text.
    ///
    /// Fails on NaN and infinities, which JSON cannot express.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number(Number::from(*i)),
            Value::UnsignedInteger(u) => serde_json::Value::Number(Number::from(*u)),
            Value::Float(f) => {
                let n = Number::from_f64(*f).ok_or(MsgPackError::NonFiniteFloat(*f))?;
                serde_json::Value::Number(n)
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(arr) => serde_json::Value::Array(
                arr.iter().map(Value::to_json).collect::<Result<Vec<_>>>()?,
            ),
            Value::Map(map) => {
                let mut obj = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    obj.insert(k.clone(), v.to_json()?);
                }
                serde_json::Value::Object(obj)
            }
        })
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::UnsignedInteger(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Deep equality where numbers compare by the quantity they denote:
    /// `Integer(26)`, `UnsignedInteger(26)` and `Float(26.0)` are all equal.
    /// NaN equals NaN so decoded trees can be compared with their source.
    pub fn numeric_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::UnsignedInteger(a), Value::UnsignedInteger(b)) => a == b,
            (Value::Integer(i), Value::UnsignedInteger(u))
            | (Value::UnsignedInteger(u), Value::Integer(i)) => u64::try_from(*i) == Ok(*u),
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                float_as_exact_i64(*f) == Some(*i)
            }
            (Value::UnsignedInteger(u), Value::Float(f))
            | (Value::Float(f), Value::UnsignedInteger(u)) => float_as_exact_u64(*f) == Some(*u),
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.numeric_eq(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.numeric_eq(vb))
            }
            _ => self == other,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(&json)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UnsignedInteger(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}
