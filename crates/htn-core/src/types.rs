//! Common types shared by the registry, the planner and callers.

use serde::{Deserialize, Serialize};

/// What a registered name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Directly executable leaf action.
    Primitive,
    /// Goal decomposed through one of its methods.
    Compound,
    /// The name is not registered.
    None,
}

impl TaskType {
    /// Returns true if the name is registered at all.
    pub fn is_known(&self) -> bool {
        !matches!(self, TaskType::None)
    }
}

/// One step of a generated plan. Plans are ordered; index is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedTask {
    pub name: String,
}

impl PlannedTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for PlannedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Planner counters. They persist across `plan()` calls until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanStats {
    /// Primitive tasks currently registered.
    pub primitive_count: usize,
    /// Compound tasks currently registered.
    pub compound_count: usize,
    /// Successful `plan()` calls.
    pub plans_generated: u64,
    /// `plan()` calls that ended in `PlanningFailed`.
    pub plans_failed: u64,
    /// Deepest depth at which the depth guard tripped.
    pub max_depth_reached: usize,
}

impl PlanStats {
    /// Total `plan()` calls that reached a verdict.
    pub fn plans_attempted(&self) -> u64 {
        self.plans_generated + self.plans_failed
    }
}
