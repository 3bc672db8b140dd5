//! Planner capacity limits.

use serde::{Deserialize, Serialize};

/// Configuration for the planner.
///
/// Fixed at construction; every registration is validated against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum length of task and method names, in bytes.
    pub max_name_len: usize,

    /// Maximum preconditions per primitive task or method.
    pub max_preconditions: usize,

    /// Maximum effects per primitive task.
    pub max_effects: usize,

    /// Maximum subtasks per method.
    pub max_subtasks: usize,

    /// Maximum methods per compound task.
    pub max_methods: usize,

    /// Maximum tasks in the registry, primitives and compounds together.
    pub max_tasks: usize,

    /// Decomposition depth beyond which planning fails.
    pub max_plan_depth: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_name_len: 64,
            max_preconditions: 8,
            max_effects: 8,
            max_subtasks: 16,
            max_methods: 8,
            max_tasks: 256,
            max_plan_depth: 100,
        }
    }
}
