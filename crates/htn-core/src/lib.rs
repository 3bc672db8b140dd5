//! # HTN Core
//!
//! Core primitives for Hierarchical Task Network planning.
//!
//! This crate provides the fundamental building blocks:
//! - [`Value`] - Typed world-state value
//! - [`Condition`] - Precondition evaluated against world state
//! - [`Effect`] - Mutation applied to world state
//! - [`WorldState`] - The typed key/value store contract
//! - [`HtnError`] - Error taxonomy

pub mod condition;
pub mod effect;
pub mod error;
pub mod limits;
pub mod types;
pub mod value;
pub mod world;

// Re-exports for convenience
pub use condition::{all_satisfied, Condition, Operator};
pub use effect::{apply_all, Effect, EffectOp};
pub use error::{FailureReason, HtnError, Result};
pub use types::{PlanStats, PlannedTask, TaskType};
pub use value::{Handle, Value, ValueKind};
pub use world::WorldState;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::condition::{Condition, Operator};
    pub use crate::effect::{Effect, EffectOp};
    pub use crate::error::{FailureReason, HtnError, Result};
    pub use crate::types::{PlanStats, PlannedTask, TaskType};
    pub use crate::value::{Handle, Value};
    pub use crate::world::WorldState;
}
