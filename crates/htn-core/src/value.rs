//! Typed values stored on the blackboard and embedded in conditions and effects.

use serde::{Deserialize, Serialize};

use crate::error::{HtnError, Result};
use crate::limits::MAX_STRING_LEN;

/// Opaque handle to something owned outside the world state.
///
/// Only the number is stored, so a copied world state never dangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u64);

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Int,
    Int64,
    Float,
    Float64,
    Bool,
    String,
    Pointer,
    Vec2,
    Vec3,
}

impl ValueKind {
    /// Returns true for `Int` and `Int64`.
    pub fn is_integer(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Int64)
    }
}

/// A typed world-state value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i32),
    Int64(i64),
    Float(f32),
    Float64(f64),
    Bool(bool),
    String(String),
    Pointer(Handle),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
}

impl Value {
    /// Build a string value, rejecting strings over [`MAX_STRING_LEN`] bytes.
    pub fn string(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        check_string_len(&s)?;
        Ok(Value::String(s))
    }

    /// The variant tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Int64(_) => ValueKind::Int64,
            Value::Float(_) => ValueKind::Float,
            Value::Float64(_) => ValueKind::Float64,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::Pointer(_) => ValueKind::Pointer,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
        }
    }

    /// Numeric view used by comparisons and `add` effects.
    ///
    /// Booleans read as 1.0/0.0 and handles as their raw number. Strings
    /// and vectors have no scalar reading and yield 0.0.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(v) => *v as f64,
            Value::Int64(v) => *v as f64,
            Value::Float(v) => *v as f64,
            Value::Float64(v) => *v,
            Value::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Pointer(h) => h.0 as f64,
            Value::String(_) | Value::Vec2(_) | Value::Vec3(_) => 0.0,
        }
    }

    /// Returns true for kinds with a meaningful numeric reading: numbers,
    /// booleans and handles.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::String(_) | Value::Vec2(_) | Value::Vec3(_))
    }

    /// Exact integer view for `Int` and `Int64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check the string bound for `String` values; other kinds always pass.
    pub fn validate(&self) -> Result<()> {
        match self {
            Value::String(s) => check_string_len(s),
            _ => Ok(()),
        }
    }
}

pub(crate) fn check_string_len(s: &str) -> Result<()> {
    if s.len() > MAX_STRING_LEN {
        return Err(HtnError::StringTooLong {
            len: s.len(),
            max: MAX_STRING_LEN,
        });
    }
    Ok(())
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Pointer(h)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Value::Vec2(v)
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Value::Vec3(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::Int(7).as_f64(), 7.0);
        assert_eq!(Value::Float(0.5).as_f64(), 0.5);
        assert_eq!(Value::Bool(true).as_f64(), 1.0);
        assert_eq!(Value::Bool(false).as_f64(), 0.0);
        assert_eq!(Value::Pointer(Handle(42)).as_f64(), 42.0);
        assert_eq!(Value::Vec3([1.0, 2.0, 3.0]).as_f64(), 0.0);
    }

    #[test]
    fn test_string_bound() {
        assert!(Value::string("sword").is_ok());
        let long = "x".repeat(MAX_STRING_LEN + 1);
        assert_eq!(
            Value::string(long),
            Err(HtnError::StringTooLong {
                len: MAX_STRING_LEN + 1,
                max: MAX_STRING_LEN
            })
        );
    }

    #[test]
    fn test_kind_and_integer_view() {
        assert!(Value::from(3i64).kind().is_integer());
        assert!(!Value::from(3.0f64).kind().is_integer());
        assert_eq!(Value::Int(-4).as_i64(), Some(-4));
        assert_eq!(Value::Float64(4.0).as_i64(), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Value::Bool(true)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bool", "value": true}));
    }
}
