//! Typed comparison predicates evaluated against a world state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{HtnError, Result};
use crate::limits::MAX_KEY_LEN;
use crate::value::Value;
use crate::world::WorldState;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Exists,
    NotExists,
}

/// A test that must hold against world state for a task or method to be eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub op: Operator,
    /// Ignored by `Exists` and `NotExists`.
    pub value: Value,
}

impl Condition {
    pub fn new(key: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Operator::Equals, value)
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Operator::NotEquals, value)
    }

    pub fn less_than(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Operator::LessThan, value)
    }

    pub fn less_equal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Operator::LessEqual, value)
    }

    pub fn greater_than(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Operator::GreaterThan, value)
    }

    pub fn greater_equal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, Operator::GreaterEqual, value)
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(key, Operator::Exists, false)
    }

    pub fn not_exists(key: impl Into<String>) -> Self {
        Self::new(key, Operator::NotExists, false)
    }

    /// Check key and value bounds before the condition is stored.
    pub fn validate(&self) -> Result<()> {
        if self.key.len() > MAX_KEY_LEN {
            return Err(HtnError::StringTooLong {
                len: self.key.len(),
                max: MAX_KEY_LEN,
            });
        }
        self.value.validate()
    }

    /// Evaluate this condition against `world`.
    ///
    /// An absent key fails every comparison except `NotEquals`, since
    /// absence is not equal to anything.
    pub fn is_satisfied<W: WorldState>(&self, world: &W) -> bool {
        let ord = || {
            world
                .get(&self.key)
                .and_then(|stored| compare(&stored, &self.value))
        };
        let satisfied = match self.op {
            Operator::Exists => world.has(&self.key),
            Operator::NotExists => !world.has(&self.key),
            Operator::Equals => ord() == Some(Ordering::Equal),
            Operator::NotEquals => ord() != Some(Ordering::Equal),
            Operator::LessThan => ord() == Some(Ordering::Less),
            Operator::LessEqual => matches!(ord(), Some(Ordering::Less | Ordering::Equal)),
            Operator::GreaterThan => ord() == Some(Ordering::Greater),
            Operator::GreaterEqual => matches!(ord(), Some(Ordering::Greater | Ordering::Equal)),
        };
        trace!(key = %self.key, op = ?self.op, satisfied, "condition evaluated");
        satisfied
    }
}

/// True when every condition in `conditions` holds. An empty list holds.
pub fn all_satisfied<W: WorldState>(conditions: &[Condition], world: &W) -> bool {
    conditions.iter().all(|c| c.is_satisfied(world))
}

/// Order `stored` against `expected`; `None` means unordered.
///
/// Two integers compare exactly and any other pair of scalars compares
/// through `f64`, with no epsilon (NaN is unordered). A string or vector
/// only equals a value of the same kind with the same contents, and is
/// unordered against everything else.
fn compare(stored: &Value, expected: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (stored.as_i64(), expected.as_i64()) {
        return Some(a.cmp(&b));
    }
    if stored.is_scalar() && expected.is_scalar() {
        return stored.as_f64().partial_cmp(&expected.as_f64());
    }
    (stored == expected).then_some(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::testing::MapWorld;

    fn world() -> MapWorld {
        let mut w = MapWorld::default();
        w.set_int("ammo", 3).unwrap();
        w.set_float64("health", 50.0).unwrap();
        w.set_bool("alive", true).unwrap();
        w.set_string("weapon", "bow").unwrap();
        w
    }

    #[test]
    fn test_presence_operators_ignore_value() {
        let w = world();
        assert!(Condition::new("ammo", Operator::Exists, 999).is_satisfied(&w));
        assert!(!Condition::exists("gold").is_satisfied(&w));
        assert!(Condition::not_exists("gold").is_satisfied(&w));
        assert!(!Condition::not_exists("ammo").is_satisfied(&w));
    }

    #[test]
    fn test_absent_key() {
        let w = world();
        assert!(!Condition::equals("gold", 0).is_satisfied(&w));
        assert!(!Condition::less_than("gold", 10).is_satisfied(&w));
        assert!(!Condition::greater_equal("gold", 0).is_satisfied(&w));
        assert!(Condition::not_equals("gold", 0).is_satisfied(&w));
    }

    #[test]
    fn test_numeric_comparisons_across_kinds() {
        let w = world();
        assert!(Condition::equals("ammo", 3.0f64).is_satisfied(&w));
        assert!(Condition::greater_than("health", 49).is_satisfied(&w));
        assert!(Condition::less_equal("health", 50.0f32).is_satisfied(&w));
        assert!(!Condition::less_than("health", 50).is_satisfied(&w));
        assert!(Condition::equals("alive", true).is_satisfied(&w));
        assert!(Condition::equals("alive", 1).is_satisfied(&w));
        assert!(Condition::not_equals("alive", false).is_satisfied(&w));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let mut w = MapWorld::default();
        w.set_int64("id", i64::MAX).unwrap();
        // Both sides round to the same f64.
        assert!(!Condition::equals("id", i64::MAX - 1).is_satisfied(&w));
        assert!(Condition::greater_than("id", i64::MAX - 1).is_satisfied(&w));
    }

    #[test]
    fn test_string_equality() {
        let w = world();
        let bow = Value::string("bow").unwrap();
        let sword = Value::string("sword").unwrap();
        assert!(Condition::equals("weapon", bow).is_satisfied(&w));
        assert!(!Condition::equals("weapon", sword.clone()).is_satisfied(&w));
        assert!(Condition::not_equals("weapon", sword.clone()).is_satisfied(&w));
        assert!(!Condition::less_than("weapon", sword).is_satisfied(&w));
    }

    #[test]
    fn test_strings_never_equal_scalars() {
        let w = world();
        assert!(!Condition::equals("weapon", 0).is_satisfied(&w));
        assert!(!Condition::equals("weapon", false).is_satisfied(&w));
        assert!(Condition::not_equals("weapon", 0).is_satisfied(&w));
        assert!(!Condition::less_equal("weapon", 0.0f64).is_satisfied(&w));
        assert!(!Condition::greater_equal("ammo", Value::string("3").unwrap()).is_satisfied(&w));
    }

    #[test]
    fn test_vectors_compare_by_contents_only() {
        let mut w = MapWorld::default();
        w.set_vec2("pos", [1.0, 2.0]).unwrap();
        assert!(Condition::equals("pos", [1.0f32, 2.0]).is_satisfied(&w));
        assert!(Condition::less_equal("pos", [1.0f32, 2.0]).is_satisfied(&w));
        assert!(!Condition::equals("pos", [3.0f32, 4.0]).is_satisfied(&w));
        assert!(!Condition::less_equal("pos", [3.0f32, 4.0]).is_satisfied(&w));
        assert!(Condition::not_equals("pos", [3.0f32, 4.0]).is_satisfied(&w));
        assert!(!Condition::equals("pos", [1.0f32, 2.0, 0.0]).is_satisfied(&w));
        assert!(!Condition::equals("pos", 0).is_satisfied(&w));
    }

    #[test]
    fn test_validate_key_length() {
        let cond = Condition::exists("k".repeat(MAX_KEY_LEN + 1));
        assert!(matches!(
            cond.validate(),
            Err(HtnError::StringTooLong { .. })
        ));
        assert!(Condition::exists("k").validate().is_ok());
    }

    #[test]
    fn test_all_satisfied() {
        let w = world();
        assert!(all_satisfied(&[], &w));
        assert!(all_satisfied(
            &[Condition::exists("ammo"), Condition::equals("alive", true)],
            &w
        ));
        assert!(!all_satisfied(
            &[Condition::exists("ammo"), Condition::exists("gold")],
            &w
        ));
    }
}
