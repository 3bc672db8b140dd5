//! Typed mutations applied to world state when a primitive task runs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HtnError, Result};
use crate::limits::MAX_KEY_LEN;
use crate::value::Value;
use crate::world::WorldState;

/// How an [`Effect`] changes its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectOp {
    /// Overwrite with the effect's value, keeping its type.
    Set,
    /// Accumulate numerically through `f64`.
    ///
    /// The result is always written back as `Float64`, so an `Int` key
    /// becomes a float after its first `Add`.
    Add,
    /// Delete the key. The effect's value is unused.
    Remove,
}

/// A mutation of a single world-state key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub key: String,
    pub value: Value,
    pub op: EffectOp,
}

impl Effect {
    pub fn set(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            op: EffectOp::Set,
        }
    }

    pub fn add(key: impl Into<String>, delta: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: delta.into(),
            op: EffectOp::Add,
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::Bool(false),
            op: EffectOp::Remove,
        }
    }

    /// Check key and value bounds before the effect is stored.
    pub fn validate(&self) -> Result<()> {
        if self.key.len() > MAX_KEY_LEN {
            return Err(HtnError::StringTooLong {
                len: self.key.len(),
                max: MAX_KEY_LEN,
            });
        }
        self.value.validate()
    }

    /// Apply this effect to `world`.
    pub fn apply<W: WorldState>(&self, world: &mut W) -> Result<()> {
        match self.op {
            EffectOp::Set => {
                debug!(key = %self.key, kind = ?self.value.kind(), "effect set");
                set_typed(world, &self.key, &self.value)
            }
            EffectOp::Add => {
                let current = world.get_float64_or(&self.key, 0.0);
                let next = current + self.value.as_f64();
                debug!(key = %self.key, current, next, "effect add");
                world.set_float64(&self.key, next)
            }
            EffectOp::Remove => {
                let removed = world.remove(&self.key);
                debug!(key = %self.key, removed, "effect remove");
                Ok(())
            }
        }
    }
}

/// Apply `effects` in declaration order.
pub fn apply_all<W: WorldState>(effects: &[Effect], world: &mut W) -> Result<()> {
    for effect in effects {
        effect.apply(world)?;
    }
    Ok(())
}

/// Dispatch to the setter matching the value's variant tag.
fn set_typed<W: WorldState>(world: &mut W, key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Int(v) => world.set_int(key, *v),
        Value::Int64(v) => world.set_int64(key, *v),
        Value::Float(v) => world.set_float(key, *v),
        Value::Float64(v) => world.set_float64(key, *v),
        Value::Bool(v) => world.set_bool(key, *v),
        Value::String(s) => world.set_string(key, s),
        Value::Pointer(h) => world.set_pointer(key, *h),
        Value::Vec2(v) => world.set_vec2(key, *v),
        Value::Vec3(v) => world.set_vec3(key, *v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Handle;
    use crate::world::testing::MapWorld;

    #[test]
    fn test_set_keeps_type() {
        let mut w = MapWorld::default();
        Effect::set("pos", [1.0f32, 2.0]).apply(&mut w).unwrap();
        Effect::set("target", Handle(9)).apply(&mut w).unwrap();
        Effect::set("count", 5).apply(&mut w).unwrap();
        assert_eq!(w.get("pos"), Some(Value::Vec2([1.0, 2.0])));
        assert_eq!(w.get("target"), Some(Value::Pointer(Handle(9))));
        assert_eq!(w.get("count"), Some(Value::Int(5)));
    }

    #[test]
    fn test_add_converts_to_float() {
        let mut w = MapWorld::default();
        w.set_int("gold", 10).unwrap();
        Effect::add("gold", 5).apply(&mut w).unwrap();
        assert_eq!(w.get("gold"), Some(Value::Float64(15.0)));
    }

    #[test]
    fn test_add_to_absent_key_starts_at_zero() {
        let mut w = MapWorld::default();
        Effect::add("xp", 2.5f64).apply(&mut w).unwrap();
        assert_eq!(w.get_float64_or("xp", -1.0), 2.5);
    }

    #[test]
    fn test_add_over_non_numeric_reads_zero() {
        let mut w = MapWorld::default();
        w.set_string("name", "bob").unwrap();
        Effect::add("name", 1).apply(&mut w).unwrap();
        assert_eq!(w.get("name"), Some(Value::Float64(1.0)));
    }

    #[test]
    fn test_remove() {
        let mut w = MapWorld::default();
        w.set_bool("flag", true).unwrap();
        Effect::remove("flag").apply(&mut w).unwrap();
        assert!(!w.has("flag"));
        // Removing an absent key is a no-op.
        Effect::remove("flag").apply(&mut w).unwrap();
    }

    #[test]
    fn test_apply_all_in_order() {
        let mut w = MapWorld::default();
        apply_all(
            &[
                Effect::set("x", 1),
                Effect::add("x", 1),
                Effect::set("done", true),
            ],
            &mut w,
        )
        .unwrap();
        assert_eq!(w.get("x"), Some(Value::Float64(2.0)));
        assert_eq!(w.get("done"), Some(Value::Bool(true)));
    }
}
