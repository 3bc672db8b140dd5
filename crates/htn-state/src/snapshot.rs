//! Point-in-time views of a blackboard.

use std::collections::BTreeMap;

use htn_core::Value;
use serde::{Deserialize, Serialize};

/// An ordered copy of a blackboard's contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Version of the blackboard at snapshot time.
    pub version: u64,

    /// All entries at snapshot time, ordered by key.
    pub entries: BTreeMap<String, Value>,
}

/// One key's difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum StateChange {
    Added { key: String, value: Value },
    Changed { key: String, from: Value, to: Value },
    Removed { key: String, value: Value },
}

impl StateChange {
    pub fn key(&self) -> &str {
        match self {
            StateChange::Added { key, .. }
            | StateChange::Changed { key, .. }
            | StateChange::Removed { key, .. } => key,
        }
    }
}

impl StateSnapshot {
    /// Get a value from the snapshot.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compare contents with `other`, ignoring version.
    pub fn same_contents(&self, other: &StateSnapshot) -> bool {
        self.entries == other.entries
    }

    /// Changes that turn `self` into `newer`, ordered by key.
    pub fn diff(&self, newer: &StateSnapshot) -> Vec<StateChange> {
        let mut changes = Vec::new();

        for (key, old) in &self.entries {
            match newer.entries.get(key) {
                None => changes.push(StateChange::Removed {
                    key: key.clone(),
                    value: old.clone(),
                }),
                Some(new) if new != old => changes.push(StateChange::Changed {
                    key: key.clone(),
                    from: old.clone(),
                    to: new.clone(),
                }),
                Some(_) => {}
            }
        }
        for (key, new) in &newer.entries {
            if !self.entries.contains_key(key) {
                changes.push(StateChange::Added {
                    key: key.clone(),
                    value: new.clone(),
                });
            }
        }

        changes.sort_by(|a, b| a.key().cmp(b.key()));
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Blackboard;
    use htn_core::WorldState;

    #[test]
    fn test_diff() {
        let mut bb = Blackboard::new();
        bb.set_int("gold", 100).unwrap();
        bb.set_bool("has_bow", true).unwrap();
        let before = bb.snapshot();

        bb.set_float64("gold", 150.0).unwrap();
        bb.remove("has_bow");
        bb.set_bool("at_target", true).unwrap();
        let after = bb.snapshot();

        let changes = before.diff(&after);
        assert_eq!(changes.len(), 3);
        assert_eq!(
            changes[0],
            StateChange::Added {
                key: "at_target".to_string(),
                value: Value::Bool(true)
            }
        );
        assert_eq!(changes[1].key(), "gold");
        assert!(matches!(changes[2], StateChange::Removed { .. }));
        assert!(!before.same_contents(&after));
    }

    #[test]
    fn test_same_contents_ignores_version() {
        let mut a = Blackboard::new();
        a.set_int("x", 1).unwrap();
        a.set_int("x", 1).unwrap();
        let mut b = Blackboard::new();
        b.set_int("x", 1).unwrap();

        assert_ne!(a.snapshot(), b.snapshot());
        assert!(a.snapshot().same_contents(&b.snapshot()));
        assert!(a.snapshot().diff(&b.snapshot()).is_empty());
    }

    #[test]
    fn test_serializes_ordered() {
        let mut bb = Blackboard::new();
        bb.set_int("b", 2).unwrap();
        bb.set_int("a", 1).unwrap();
        let json = serde_json::to_string(&bb.snapshot()).unwrap();
        assert!(json.find("\"a\"").unwrap() < json.find("\"b\"").unwrap());
    }
}
