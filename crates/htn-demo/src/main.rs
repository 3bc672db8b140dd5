//! # HTN Demo
//!
//! Builds a small combat domain, plans against a blackboard and executes
//! the resulting plan step by step.
//!
//! Usage: `htn-demo [planner-config.json]`

use std::path::Path;

use anyhow::Context;
use htn_core::prelude::*;
use htn_planner::{CompoundTask, HtnPlanner, Method, PlannerConfig, PrimitiveTask};
use htn_state::Blackboard;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Load a planner configuration, falling back to defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading planner config {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("parsing planner config {}", path.display()))?;
    Ok(config)
}

/// Register the combat domain.
fn define_domain(planner: &mut HtnPlanner) -> anyhow::Result<()> {
    planner.define_primitive(
        "pick_up_bow",
        PrimitiveTask::builder()
            .precondition(Condition::exists("bow_nearby"))
            .effect(Effect::set("has_bow", true))
            .effect(Effect::remove("bow_nearby"))
            .cost(1.0),
    )?;
    planner.define_primitive(
        "move_to_target",
        PrimitiveTask::builder()
            .effect(Effect::set("at_target", true))
            .cost(2.0),
    )?;
    planner.define_primitive(
        "ranged_attack",
        PrimitiveTask::builder()
            .precondition(Condition::equals("has_bow", true))
            .precondition(Condition::greater_than("arrows", 0))
            .effect(Effect::add("arrows", -1))
            .effect(Effect::set("target_attacked", true))
            .cost(1.5),
    )?;
    planner.define_primitive(
        "melee_attack",
        PrimitiveTask::builder()
            .precondition(Condition::equals("at_target", true))
            .effect(Effect::set("target_attacked", true))
            .cost(3.0),
    )?;
    planner.define_compound(
        "attack",
        CompoundTask::builder()
            .method(
                Method::new("ranged")
                    .precondition(Condition::equals("has_bow", true))
                    .subtask("ranged_attack"),
            )
            .method(
                Method::new("arm_then_shoot")
                    .precondition(Condition::exists("bow_nearby"))
                    .subtasks(["pick_up_bow", "ranged_attack"]),
            )
            .method(Method::new("melee").subtasks(["move_to_target", "melee_attack"])),
    )?;
    planner.define_compound(
        "combat",
        CompoundTask::builder().method(
            Method::new("engage")
                .precondition(Condition::not_equals("target_attacked", true))
                .subtask("attack"),
        ),
    )?;
    Ok(())
}

fn run(planner: &HtnPlanner, label: &str, mut world: Blackboard) -> anyhow::Result<()> {
    info!("🎯 Scenario: {}", label);

    let plan = match planner.plan(&world, "combat") {
        Ok(plan) => plan,
        Err(err) if !err.is_fatal() => {
            warn!("❌ No plan: {}", err);
            return Ok(());
        }
        Err(err) => return Err(err).context("combat domain is misconfigured"),
    };

    info!(
        "📋 Plan ({} steps, cost {:.1}): {}",
        plan.len(),
        planner.plan_cost(&plan),
        serde_json::to_string(&plan)?
    );

    let before = world.snapshot();
    for step in &plan {
        planner.execute(&mut world, &step.name)?;
        info!("  📌 Executed {}", step);
    }
    for change in before.diff(&world.snapshot()) {
        info!("  🔄 {}", serde_json::to_string(&change)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;

    let mut planner = HtnPlanner::with_config(config);
    define_domain(&mut planner)?;

    run(&planner, "unarmed", Blackboard::new())?;

    let mut world = Blackboard::new();
    world.set_bool("bow_nearby", true)?;
    world.set_int("arrows", 3)?;
    run(&planner, "bow on the ground", world)?;

    let mut world = Blackboard::new();
    world.set_bool("has_bow", true)?;
    run(&planner, "bow without arrows", world)?;

    let mut world = Blackboard::new();
    world.set_bool("target_attacked", true)?;
    run(&planner, "already done", world)?;

    info!("📊 Stats: {}", serde_json::to_string(&planner.stats())?);
    Ok(())
}
