//! Primitive and compound task definitions.

use htn_core::{Condition, Effect};
use serde::{Deserialize, Serialize};

fn default_cost() -> f64 {
    1.0
}

/// Definition of a primitive task, before registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveOptions {
    #[serde(default)]
    pub preconditions: Vec<Condition>,

    /// Applied in declaration order.
    #[serde(default)]
    pub effects: Vec<Effect>,

    #[serde(default = "default_cost")]
    pub cost: f64,
}

impl Default for PrimitiveOptions {
    fn default() -> Self {
        Self {
            preconditions: Vec::new(),
            effects: Vec::new(),
            cost: default_cost(),
        }
    }
}

impl PrimitiveOptions {
    /// Add a precondition.
    pub fn precondition(mut self, condition: Condition) -> Self {
        self.preconditions.push(condition);
        self
    }

    /// Add an effect.
    pub fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set the cost.
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }
}

/// Definition of a compound task, before registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundOptions {
    /// Tried in this order during decomposition.
    pub methods: Vec<Method>,
}

impl CompoundOptions {
    /// Append a method.
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }
}

/// One way to decompose a compound task.
///
/// Subtask names are resolved when planning, not when registering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub preconditions: Vec<Condition>,
    pub subtasks: Vec<String>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preconditions: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    pub fn precondition(mut self, condition: Condition) -> Self {
        self.preconditions.push(condition);
        self
    }

    pub fn subtask(mut self, name: impl Into<String>) -> Self {
        self.subtasks.push(name.into());
        self
    }

    pub fn subtasks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks.extend(names.into_iter().map(Into::into));
        self
    }
}

/// A registered, directly executable task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveTask {
    name: String,
    preconditions: Box<[Condition]>,
    effects: Box<[Effect]>,
    cost: f64,
}

impl PrimitiveTask {
    /// Start a primitive definition with cost 1.0.
    pub fn builder() -> PrimitiveOptions {
        PrimitiveOptions::default()
    }

    pub(crate) fn from_options(name: String, options: PrimitiveOptions) -> Self {
        Self {
            name,
            preconditions: options.preconditions.into_boxed_slice(),
            effects: options.effects.into_boxed_slice(),
            cost: options.cost,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preconditions(&self) -> &[Condition] {
        &self.preconditions
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }
}

/// A registered goal with at least one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundTask {
    name: String,
    methods: Box<[Method]>,
}

impl CompoundTask {
    /// Start a compound definition.
    pub fn builder() -> CompoundOptions {
        CompoundOptions::default()
    }

    pub(crate) fn from_options(name: String, options: CompoundOptions) -> Self {
        Self {
            name,
            methods: options.methods.into_boxed_slice(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in registration order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_builder() {
        let options = PrimitiveTask::builder()
            .precondition(Condition::equals("at_target", true))
            .effect(Effect::set("target_attacked", true))
            .cost(2.5);

        assert_eq!(options.preconditions.len(), 1);
        assert_eq!(options.effects.len(), 1);
        assert_eq!(options.cost, 2.5);
        assert_eq!(PrimitiveTask::builder().cost, 1.0);
    }

    #[test]
    fn test_method_builder() {
        let method = Method::new("melee")
            .subtask("move_to_target")
            .subtasks(["attack", "retreat"]);
        assert_eq!(method.subtasks, vec!["move_to_target", "attack", "retreat"]);
        assert!(method.preconditions.is_empty());
    }

    #[test]
    fn test_options_from_json() {
        let options: PrimitiveOptions = serde_json::from_str(
            r#"{"effects": [{"key": "at_target", "value": {"type": "bool", "value": true}, "op": "set"}]}"#,
        )
        .unwrap();
        assert_eq!(options.cost, 1.0);
        assert_eq!(options.effects[0], Effect::set("at_target", true));

        let compound: CompoundOptions = serde_json::from_str(
            r#"{"methods": [{"name": "default", "subtasks": ["a", "b"]}]}"#,
        )
        .unwrap();
        assert_eq!(compound.methods[0].subtasks.len(), 2);
    }
}
