//! Error types for the HTN planner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a `plan()` call could not produce a plan.
///
/// Failures are normal outcomes: the goal is unreachable under the current
/// world state. They never carry a partial plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// A primitive task's preconditions did not hold at its point in the plan.
    PreconditionsNotMet { task: String },

    /// No method of a compound task had its preconditions satisfied.
    NoApplicableMethod { task: String },

    /// Decomposition went deeper than the configured plan depth.
    DepthExceeded { task: String, depth: usize },
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::PreconditionsNotMet { task } => {
                write!(f, "preconditions of '{}' not met", task)
            }
            FailureReason::NoApplicableMethod { task } => {
                write!(f, "no applicable method for '{}'", task)
            }
            FailureReason::DepthExceeded { task, depth } => {
                write!(f, "depth {} exceeded while expanding '{}'", depth, task)
            }
        }
    }
}

/// Main error type for HTN operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HtnError {
    /// Task or method name is longer than the configured maximum.
    #[error("Name too long: '{name}' is {len} bytes, limit {max}")]
    NameTooLong { name: String, len: usize, max: usize },

    /// A key or string value is longer than the store allows.
    #[error("String too long: {len} bytes, limit {max}")]
    StringTooLong { len: usize, max: usize },

    /// More preconditions than a task or method may hold.
    #[error("Too many preconditions on '{owner}': {count}, limit {max}")]
    TooManyPreconditions { owner: String, count: usize, max: usize },

    /// More effects than a primitive may hold.
    #[error("Too many effects on '{task}': {count}, limit {max}")]
    TooManyEffects { task: String, count: usize, max: usize },

    /// More subtasks than a method may hold.
    #[error("Too many subtasks in method '{method}': {count}, limit {max}")]
    TooManySubtasks { method: String, count: usize, max: usize },

    /// More methods than a compound may hold.
    #[error("Too many methods on '{task}': {count}, limit {max}")]
    TooManyMethods { task: String, count: usize, max: usize },

    /// A compound task was defined without methods.
    #[error("Compound task '{task}' has no methods")]
    NoMethods { task: String },

    /// A method was defined without subtasks.
    #[error("Method '{method}' has no subtasks")]
    NoSubtasks { method: String },

    /// A task with this name is already registered.
    #[error("Duplicate task: '{name}'")]
    DuplicateTask { name: String },

    /// The registry holds the maximum number of tasks.
    #[error("Task registry full: limit {max}")]
    RegistryFull { max: usize },

    /// The goal could not be decomposed under the current world state.
    #[error("Planning failed for '{root}': {reason}")]
    PlanningFailed { root: String, reason: FailureReason },

    /// A root or subtask name was never registered.
    #[error("Unknown task: '{name}'")]
    UnknownTask { name: String },

    /// Direct execution was refused because preconditions do not hold.
    #[error("Preconditions not met for '{task}'")]
    PreconditionsNotMet { task: String },

    /// Direct execution was requested for a compound task.
    #[error("Task '{task}' is not primitive")]
    NotPrimitive { task: String },
}

impl HtnError {
    /// Returns true if this error was raised while defining tasks.
    ///
    /// Registration errors never leave the registry partially modified.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            HtnError::NameTooLong { .. }
                | HtnError::StringTooLong { .. }
                | HtnError::TooManyPreconditions { .. }
                | HtnError::TooManyEffects { .. }
                | HtnError::TooManySubtasks { .. }
                | HtnError::TooManyMethods { .. }
                | HtnError::NoMethods { .. }
                | HtnError::NoSubtasks { .. }
                | HtnError::DuplicateTask { .. }
                | HtnError::RegistryFull { .. }
        )
    }

    /// Returns true if this error points at a broken task domain rather
    /// than a goal that is merely unreachable right now.
    pub fn is_fatal(&self) -> bool {
        match self {
            HtnError::PlanningFailed { .. } | HtnError::PreconditionsNotMet { .. } => false,
            HtnError::UnknownTask { .. } | HtnError::NotPrimitive { .. } => true,
            other => other.is_registration_error(),
        }
    }

    /// Returns the failure reason for `PlanningFailed`.
    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            HtnError::PlanningFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Convenience Result type for HTN operations.
pub type Result<T> = std::result::Result<T, HtnError>;
