//! # HTN State
//!
//! Typed blackboard the planner simulates effects against.

pub mod snapshot;
pub mod store;

pub use snapshot::{StateChange, StateSnapshot};
pub use store::Blackboard;
