//! The world-state contract consumed by conditions, effects and the planner.

use crate::error::Result;
use crate::value::{Handle, Value};

/// A typed key/value store the planner reads preconditions from and
/// writes effects to.
///
/// `Clone` is the snapshot operation: a clone must own all of its storage
/// so that mutating or dropping the source leaves the copy intact.
pub trait WorldState: Clone {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Check whether `key` is present.
    fn has(&self, key: &str) -> bool;

    /// Remove `key`, returning whether it was present.
    fn remove(&mut self, key: &str) -> bool;

    /// Store `value` under `key`, replacing whatever was there.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn set_int(&mut self, key: &str, value: i32) -> Result<()> {
        self.set(key, Value::Int(value))
    }

    fn set_int64(&mut self, key: &str, value: i64) -> Result<()> {
        self.set(key, Value::Int64(value))
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        self.set(key, Value::Float(value))
    }

    fn set_float64(&mut self, key: &str, value: f64) -> Result<()> {
        self.set(key, Value::Float64(value))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.set(key, Value::Bool(value))
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key, Value::string(value)?)
    }

    fn set_pointer(&mut self, key: &str, value: Handle) -> Result<()> {
        self.set(key, Value::Pointer(value))
    }

    fn set_vec2(&mut self, key: &str, value: [f32; 2]) -> Result<()> {
        self.set(key, Value::Vec2(value))
    }

    fn set_vec3(&mut self, key: &str, value: [f32; 3]) -> Result<()> {
        self.set(key, Value::Vec3(value))
    }

    /// Integer under `key`, or `default` when absent or not an `Int`.
    fn get_int_or(&self, key: &str, default: i32) -> i32 {
        match self.get(key) {
            Some(Value::Int(v)) => v,
            _ => default,
        }
    }

    /// 64-bit integer under `key`; `Int` values widen.
    fn get_int64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(|v| v.as_i64()).unwrap_or(default)
    }

    /// Float under `key`; any numeric kind is accepted.
    fn get_float_or(&self, key: &str, default: f32) -> f32 {
        match self.get(key) {
            Some(v) if is_numeric(&v) => v.as_f64() as f32,
            _ => default,
        }
    }

    /// 64-bit float under `key`; any numeric kind is accepted.
    fn get_float64_or(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(v) if is_numeric(&v) => v.as_f64(),
            _ => default,
        }
    }

    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
    }

    fn get_string_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s,
            _ => default.to_string(),
        }
    }
}

fn is_numeric(value: &Value) -> bool {
    matches!(
        value,
        Value::Int(_) | Value::Int64(_) | Value::Float(_) | Value::Float64(_)
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Minimal map-backed world for unit tests in this crate.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct MapWorld {
        pub entries: HashMap<String, Value>,
    }

    impl WorldState for MapWorld {
        fn get(&self, key: &str) -> Option<Value> {
            self.entries.get(key).cloned()
        }

        fn has(&self, key: &str) -> bool {
            self.entries.contains_key(key)
        }

        fn remove(&mut self, key: &str) -> bool {
            self.entries.remove(key).is_some()
        }

        fn set(&mut self, key: &str, value: Value) -> Result<()> {
            self.entries.insert(key.to_string(), value);
            Ok(())
        }
    }

    #[test]
    fn test_typed_getters_with_default() {
        let mut w = MapWorld::default();
        w.set_int("n", 4).unwrap();
        w.set_string("s", "hi").unwrap();
        assert_eq!(w.get_int_or("n", 0), 4);
        assert_eq!(w.get_int64_or("n", 0), 4);
        assert_eq!(w.get_float_or("n", 0.0), 4.0);
        assert_eq!(w.get_float64_or("s", 1.5), 1.5);
        assert!(w.get_bool_or("missing", true));
        assert_eq!(w.get_string_or("s", ""), "hi");
        assert_eq!(w.get_string_or("n", "none"), "none");
    }
}
