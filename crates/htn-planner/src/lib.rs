//! # HTN Planner
//!
//! Decomposes compound goals into ordered primitive plans by forward
//! simulation against a typed world state.

pub mod config;
pub mod planner;
pub mod registry;
pub mod task;

pub use config::PlannerConfig;
pub use planner::{HtnPlanner, MethodChoice, PlanOutcome};
pub use registry::TaskRegistry;
pub use task::{CompoundOptions, CompoundTask, Method, PrimitiveOptions, PrimitiveTask};
