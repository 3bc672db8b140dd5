//! Blackboard implementation of [`WorldState`].

use std::collections::HashMap;

use htn_core::limits::{MAX_KEY_LEN, MAX_STRING_LEN};
use htn_core::{HtnError, Result, Value, WorldState};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::snapshot::StateSnapshot;

/// In-memory typed key/value store.
///
/// Cloning produces an independent copy that owns all of its strings, so
/// a planner's scratch copy is unaffected by later writes to the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blackboard {
    /// Current values by key.
    entries: HashMap<String, Value>,

    /// Bumped on every successful write or removal.
    version: u64,
}

impl Blackboard {
    /// Create an empty blackboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful mutations so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All keys, in no particular order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.version += 1;
        }
    }

    /// Take an ordered, serializable view of the current contents.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            version: self.version,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    fn check_key(key: &str) -> Result<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(HtnError::StringTooLong {
                len: key.len(),
                max: MAX_KEY_LEN,
            });
        }
        Ok(())
    }
}

impl WorldState for Blackboard {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.version += 1;
        }
        removed
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        Self::check_key(key)?;
        if let Value::String(s) = &value {
            if s.len() > MAX_STRING_LEN {
                return Err(HtnError::StringTooLong {
                    len: s.len(),
                    max: MAX_STRING_LEN,
                });
            }
        }
        trace!(key, kind = ?value.kind(), "blackboard write");
        self.entries.insert(key.to_string(), value);
        self.version += 1;
        Ok(())
    }
}

impl From<StateSnapshot> for Blackboard {
    fn from(snapshot: StateSnapshot) -> Self {
        Self {
            entries: snapshot.entries.into_iter().collect(),
            version: snapshot.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use htn_core::Handle;

    #[test]
    fn test_set_and_get() {
        let mut bb = Blackboard::new();

        bb.set_int("ammo", 42).unwrap();

        assert_eq!(bb.get("ammo"), Some(Value::Int(42)));
        assert!(bb.has("ammo"));
        assert_eq!(bb.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut bb = Blackboard::new();

        bb.set_bool("flag", true).unwrap();
        assert!(bb.remove("flag"));
        assert!(!bb.remove("flag"));

        assert!(bb.get("flag").is_none());
    }

    #[test]
    fn test_versioning() {
        let mut bb = Blackboard::new();

        bb.set_float("speed", 1.0).unwrap();
        let v1 = bb.version();
        bb.set_float("speed", 2.0).unwrap();

        assert!(bb.version() > v1);
        assert_eq!(bb.get_float_or("speed", 0.0), 2.0);

        // A failed write does not bump the version.
        let v2 = bb.version();
        assert!(bb.set_int(&"k".repeat(MAX_KEY_LEN + 1), 1).is_err());
        assert_eq!(bb.version(), v2);
    }

    #[test]
    fn test_bounds() {
        let mut bb = Blackboard::new();

        assert!(matches!(
            bb.set_int(&"k".repeat(MAX_KEY_LEN + 1), 1),
            Err(HtnError::StringTooLong { .. })
        ));
        assert!(matches!(
            bb.set(
                "name",
                Value::String("x".repeat(MAX_STRING_LEN + 1))
            ),
            Err(HtnError::StringTooLong { .. })
        ));
        assert!(bb.is_empty());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut source = Blackboard::new();
        source.set_string("weapon", "bow").unwrap();
        source.set_pointer("target", Handle(7)).unwrap();

        let copy = source.clone();
        source.set_string("weapon", "axe").unwrap();
        source.remove("target");

        assert_eq!(copy.get_string_or("weapon", ""), "bow");
        assert_eq!(copy.get("target"), Some(Value::Pointer(Handle(7))));
        drop(source);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut bb = Blackboard::new();
        bb.set_vec3("pos", [1.0, 2.0, 3.0]).unwrap();
        bb.set_int64("score", 9).unwrap();

        let restored = Blackboard::from(bb.snapshot());

        assert_eq!(restored, bb);
    }
}
