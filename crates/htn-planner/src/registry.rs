//! Validated, capacity-bounded storage of task definitions.

use htn_core::{Condition, HtnError, Result, TaskType};
use indexmap::IndexMap;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::task::{CompoundOptions, CompoundTask, PrimitiveOptions, PrimitiveTask};

/// Primitive and compound tasks keyed by unique name.
///
/// Every definition is fully validated before anything is inserted, so a
/// rejected definition leaves the registry untouched.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    config: PlannerConfig,
    primitives: IndexMap<String, PrimitiveTask>,
    compounds: IndexMap<String, CompoundTask>,
}

impl TaskRegistry {
    /// Create an empty registry bounded by `config`.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            primitives: IndexMap::new(),
            compounds: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Register a primitive task.
    pub fn define_primitive(
        &mut self,
        name: impl Into<String>,
        options: PrimitiveOptions,
    ) -> Result<()> {
        let name = name.into();
        self.check_name(&name)?;
        self.check_preconditions(&name, &options.preconditions)?;
        if options.effects.len() > self.config.max_effects {
            return Err(HtnError::TooManyEffects {
                task: name,
                count: options.effects.len(),
                max: self.config.max_effects,
            });
        }
        for effect in &options.effects {
            effect.validate()?;
        }
        self.check_free_slot(&name)?;

        debug!(
            task = %name,
            preconditions = options.preconditions.len(),
            effects = options.effects.len(),
            cost = options.cost,
            "defined primitive"
        );
        let task = PrimitiveTask::from_options(name.clone(), options);
        self.primitives.insert(name, task);
        Ok(())
    }

    /// Register a compound task. Method order is kept.
    pub fn define_compound(
        &mut self,
        name: impl Into<String>,
        options: CompoundOptions,
    ) -> Result<()> {
        let name = name.into();
        self.check_name(&name)?;
        if options.methods.is_empty() {
            return Err(HtnError::NoMethods { task: name });
        }
        if options.methods.len() > self.config.max_methods {
            return Err(HtnError::TooManyMethods {
                task: name,
                count: options.methods.len(),
                max: self.config.max_methods,
            });
        }
        for method in &options.methods {
            self.check_name(&method.name)?;
            self.check_preconditions(&method.name, &method.preconditions)?;
            if method.subtasks.is_empty() {
                return Err(HtnError::NoSubtasks {
                    method: method.name.clone(),
                });
            }
            if method.subtasks.len() > self.config.max_subtasks {
                return Err(HtnError::TooManySubtasks {
                    method: method.name.clone(),
                    count: method.subtasks.len(),
                    max: self.config.max_subtasks,
                });
            }
            for subtask in &method.subtasks {
                self.check_name(subtask)?;
            }
        }
        self.check_free_slot(&name)?;

        debug!(task = %name, methods = options.methods.len(), "defined compound");
        let task = CompoundTask::from_options(name.clone(), options);
        self.compounds.insert(name, task);
        Ok(())
    }

    /// What `name` resolves to.
    pub fn task_type(&self, name: &str) -> TaskType {
        if self.primitives.contains_key(name) {
            TaskType::Primitive
        } else if self.compounds.contains_key(name) {
            TaskType::Compound
        } else {
            TaskType::None
        }
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.task_type(name).is_known()
    }

    pub fn primitive(&self, name: &str) -> Option<&PrimitiveTask> {
        self.primitives.get(name)
    }

    pub fn compound(&self, name: &str) -> Option<&CompoundTask> {
        self.compounds.get(name)
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    pub fn len(&self) -> usize {
        self.primitives.len() + self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names: primitives first, each group in registration order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.primitives
            .keys()
            .chain(self.compounds.keys())
            .map(String::as_str)
    }

    /// Drop every definition.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.compounds.clear();
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if name.len() > self.config.max_name_len {
            return Err(HtnError::NameTooLong {
                name: name.to_string(),
                len: name.len(),
                max: self.config.max_name_len,
            });
        }
        Ok(())
    }

    fn check_preconditions(&self, owner: &str, conditions: &[Condition]) -> Result<()> {
        if conditions.len() > self.config.max_preconditions {
            return Err(HtnError::TooManyPreconditions {
                owner: owner.to_string(),
                count: conditions.len(),
                max: self.config.max_preconditions,
            });
        }
        conditions.iter().try_for_each(Condition::validate)
    }

    fn check_free_slot(&self, name: &str) -> Result<()> {
        if self.has_task(name) {
            return Err(HtnError::DuplicateTask {
                name: name.to_string(),
            });
        }
        if self.len() >= self.config.max_tasks {
            return Err(HtnError::RegistryFull {
                max: self.config.max_tasks,
            });
        }
        Ok(())
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}
