//! Decomposition engine, direct execution and planner statistics.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use htn_core::{
    all_satisfied, apply_all, FailureReason, HtnError, PlanStats, PlannedTask, Result, TaskType,
    WorldState,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::registry::TaskRegistry;
use crate::task::{CompoundOptions, PrimitiveOptions};

/// Record of which method expanded a compound task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodChoice {
    /// The compound task that was decomposed.
    pub task: String,
    /// The method chosen.
    pub method: String,
    /// Depth of the compound in the decomposition tree; the root is 0.
    pub depth: usize,
}

/// A successful decomposition with everything the planner learned on the way.
#[derive(Debug, Clone)]
pub struct PlanOutcome<W> {
    /// Primitive tasks in execution order.
    pub tasks: Vec<PlannedTask>,
    /// Method choices in decomposition order.
    pub methods: Vec<MethodChoice>,
    /// Scratch world state after simulating every step.
    pub final_state: W,
}

/// Counters shared by concurrent `plan()` calls.
#[derive(Debug, Default)]
struct Counters {
    plans_generated: AtomicU64,
    plans_failed: AtomicU64,
    max_depth_reached: AtomicUsize,
}

/// Why a decomposition branch stopped.
enum Halt {
    /// The goal is unreachable; counted as a failed plan.
    Failed(FailureReason),
    /// The domain is broken; surfaced as-is.
    Fatal(HtnError),
}

impl From<HtnError> for Halt {
    fn from(err: HtnError) -> Self {
        Halt::Fatal(err)
    }
}

/// Running state of one `plan()` call.
struct Search<'w, W> {
    scratch: &'w mut W,
    tasks: Vec<PlannedTask>,
    methods: Vec<MethodChoice>,
}

/// Hierarchical Task Network planner.
///
/// Registration takes `&mut self` and planning takes `&self`, so the
/// registry cannot change while any plan is being computed. Each `plan()`
/// call simulates on its own copy of the world, so one planner can serve
/// several threads planning against independent worlds.
#[derive(Debug)]
pub struct HtnPlanner {
    registry: TaskRegistry,
    counters: Counters,
}

impl HtnPlanner {
    /// Create a new planner with default configuration.
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    /// Create a new planner with custom configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            registry: TaskRegistry::new(config),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.registry.config()
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Register a primitive task.
    pub fn define_primitive(
        &mut self,
        name: impl Into<String>,
        options: PrimitiveOptions,
    ) -> Result<()> {
        self.registry.define_primitive(name, options)
    }

    /// Register a compound task.
    pub fn define_compound(
        &mut self,
        name: impl Into<String>,
        options: CompoundOptions,
    ) -> Result<()> {
        self.registry.define_compound(name, options)
    }

    pub fn task_type(&self, name: &str) -> TaskType {
        self.registry.task_type(name)
    }

    pub fn has_task(&self, name: &str) -> bool {
        self.registry.has_task(name)
    }

    /// Decompose `root` into an ordered list of primitive tasks.
    ///
    /// `world` is only read. Fails with `PlanningFailed` when the goal is
    /// unreachable, or `UnknownTask` when the domain references a name that
    /// was never registered.
    pub fn plan<W: WorldState>(&self, world: &W, root: &str) -> Result<Vec<PlannedTask>> {
        self.plan_detailed(world, root).map(|outcome| outcome.tasks)
    }

    /// Like [`plan`](Self::plan), also returning method choices and the
    /// simulated final state.
    pub fn plan_detailed<W: WorldState>(&self, world: &W, root: &str) -> Result<PlanOutcome<W>> {
        let mut scratch = world.clone();
        let mut search = Search {
            scratch: &mut scratch,
            tasks: Vec::new(),
            methods: Vec::new(),
        };

        let result = self.decompose(&mut search, root, 0);
        let Search { tasks, methods, .. } = search;

        match result {
            Ok(()) => {
                self.counters.plans_generated.fetch_add(1, Ordering::Relaxed);
                info!(root, steps = tasks.len(), "plan generated");
                Ok(PlanOutcome {
                    tasks,
                    methods,
                    final_state: scratch,
                })
            }
            Err(Halt::Failed(reason)) => {
                self.counters.plans_failed.fetch_add(1, Ordering::Relaxed);
                warn!(root, %reason, "planning failed");
                Err(HtnError::PlanningFailed {
                    root: root.to_string(),
                    reason,
                })
            }
            Err(Halt::Fatal(err)) => {
                warn!(root, error = %err, "planning aborted");
                Err(err)
            }
        }
    }

    fn decompose<W: WorldState>(
        &self,
        search: &mut Search<'_, W>,
        name: &str,
        depth: usize,
    ) -> std::result::Result<(), Halt> {
        let config = self.registry.config();

        if depth > config.max_plan_depth {
            self.counters
                .max_depth_reached
                .fetch_max(depth, Ordering::Relaxed);
            warn!(task = name, depth, "plan depth limit exceeded");
            return Err(Halt::Failed(FailureReason::DepthExceeded {
                task: name.to_string(),
                depth,
            }));
        }

        if let Some(task) = self.registry.primitive(name) {
            if !all_satisfied(task.preconditions(), &*search.scratch) {
                debug!(task = name, depth, "primitive preconditions not met");
                return Err(Halt::Failed(FailureReason::PreconditionsNotMet {
                    task: name.to_string(),
                }));
            }
            search.tasks.push(PlannedTask::new(name));
            apply_all(task.effects(), &mut *search.scratch)?;
            return Ok(());
        }

        if let Some(task) = self.registry.compound(name) {
            // First method whose own preconditions hold; subtasks are not looked ahead.
            let method = task
                .methods()
                .iter()
                .find(|m| all_satisfied(&m.preconditions, &*search.scratch))
                .ok_or_else(|| {
                    debug!(task = name, depth, "no applicable method");
                    Halt::Failed(FailureReason::NoApplicableMethod {
                        task: name.to_string(),
                    })
                })?;

            debug!(task = name, method = %method.name, depth, "method selected");
            search.methods.push(MethodChoice {
                task: name.to_string(),
                method: method.name.clone(),
                depth,
            });

            // No backtracking: a failed subtask fails the whole compound.
            let mark = search.tasks.len();
            for subtask in &method.subtasks {
                if let Err(halt) = self.decompose(search, subtask, depth + 1) {
                    search.tasks.truncate(mark);
                    return Err(halt);
                }
            }
            return Ok(());
        }

        Err(Halt::Fatal(HtnError::UnknownTask {
            name: name.to_string(),
        }))
    }

    /// Whether `name` could start right now.
    ///
    /// Primitives check their preconditions; compounds check whether any
    /// method qualifies, without looking into subtasks. Unknown names are
    /// never executable.
    pub fn can_execute<W: WorldState>(&self, world: &W, name: &str) -> bool {
        if let Some(task) = self.registry.primitive(name) {
            return all_satisfied(task.preconditions(), world);
        }
        if let Some(task) = self.registry.compound(name) {
            return task
                .methods()
                .iter()
                .any(|m| all_satisfied(&m.preconditions, world));
        }
        false
    }

    /// Apply a primitive's effects directly to the caller's live `world`.
    pub fn execute<W: WorldState>(&self, world: &mut W, name: &str) -> Result<()> {
        let task = match self.registry.task_type(name) {
            TaskType::Primitive => self.registry.primitive(name),
            TaskType::Compound => {
                return Err(HtnError::NotPrimitive {
                    task: name.to_string(),
                })
            }
            TaskType::None => None,
        }
        .ok_or_else(|| HtnError::UnknownTask {
            name: name.to_string(),
        })?;

        if !all_satisfied(task.preconditions(), world) {
            return Err(HtnError::PreconditionsNotMet {
                task: name.to_string(),
            });
        }
        debug!(task = name, "executing primitive");
        apply_all(task.effects(), world)
    }

    /// Replay `plan` on a copy of `world` and report whether every step's
    /// preconditions still hold when its turn comes.
    pub fn validate_plan<W: WorldState>(&self, world: &W, plan: &[PlannedTask]) -> Result<bool> {
        let mut state = world.clone();

        for step in plan {
            match self.execute(&mut state, &step.name) {
                Ok(()) => {}
                Err(HtnError::PreconditionsNotMet { .. }) => {
                    debug!(task = %step.name, "plan no longer valid");
                    return Ok(false);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(true)
    }

    /// Cost of a primitive task.
    pub fn task_cost(&self, name: &str) -> Option<f64> {
        self.registry.primitive(name).map(|task| task.cost())
    }

    /// Sum of step costs; unknown names contribute nothing.
    pub fn plan_cost(&self, plan: &[PlannedTask]) -> f64 {
        plan.iter()
            .map(|step| self.task_cost(&step.name).unwrap_or(0.0))
            .sum()
    }

    pub fn stats(&self) -> PlanStats {
        PlanStats {
            primitive_count: self.registry.primitive_count(),
            compound_count: self.registry.compound_count(),
            plans_generated: self.counters.plans_generated.load(Ordering::Relaxed),
            plans_failed: self.counters.plans_failed.load(Ordering::Relaxed),
            max_depth_reached: self.counters.max_depth_reached.load(Ordering::Relaxed),
        }
    }

    /// Zero the planning counters.
    pub fn reset_stats(&self) {
        self.counters.plans_generated.store(0, Ordering::Relaxed);
        self.counters.plans_failed.store(0, Ordering::Relaxed);
        self.counters.max_depth_reached.store(0, Ordering::Relaxed);
    }

    /// Drop every task definition. Counters are kept.
    pub fn clear(&mut self) {
        self.registry.clear();
    }
}

impl Default for HtnPlanner {
    fn default() -> Self {
        Self::new()
    }
}
