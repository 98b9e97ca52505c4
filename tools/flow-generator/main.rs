use clap::Parser;
use flowguard::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use std::fs;

const COMPONENTS: [&str; 6] = [
    "keboola.ex-db-snowflake",
    "keboola.ex-google-analytics-v4",
    "keboola.snowflake-transformation",
    "keboola.python-transformation-v2",
    "keboola.wr-google-sheets",
    "keboola.wr-db-mysql",
];

/// A CLI tool to generate random valid flows for the flowguard validator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// Flow type: orchestrator (keboola.orchestrator) or conditional (keboola.flow)
    #[arg(short = 't', long, default_value = "orchestrator")]
    flow_type: FlowType,

    /// Number of phases to generate
    #[arg(long, default_value_t = 5)]
    phases: usize,

    /// The maximum number of tasks per phase
    #[arg(long, default_value_t = 3)]
    tasks_per_phase: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.phases == 0 {
        eprintln!("Error: --phases must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating {} flow ({} phase(s), up to {} task(s) each)...",
        cli.flow_type, cli.phases, cli.tasks_per_phase
    );

    let (phases, tasks) = match cli.flow_type {
        FlowType::Orchestrator => generate_legacy(&mut rng, cli.phases, cli.tasks_per_phase),
        FlowType::Conditional => generate_conditional(&mut rng, cli.phases, cli.tasks_per_phase),
    };

    // Generated flows must pass validation, otherwise they are useless as fixtures.
    build_and_validate_flow(&phases, &tasks, cli.flow_type)?;

    let json_output = serde_json::to_string_pretty(&json!({"phases": phases, "tasks": tasks}))?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved {} phase(s) and {} task(s) to '{}'",
        phases.len(),
        tasks.len(),
        cli.output
    );

    Ok(())
}

/// Phases depend on a random subset of earlier phases, so the result is always a DAG.
/// Task ids are left out to exercise id assignment.
fn generate_legacy(rng: &mut ThreadRng, count: usize, max_tasks: usize) -> (Vec<Value>, Vec<Value>) {
    let mut phases = Vec::with_capacity(count);
    let mut tasks = Vec::new();

    for index in 0..count {
        let id = index as i64 + 1;
        let depends_on: Vec<i64> = (1..id).filter(|_| rng.random_bool(0.4)).collect();
        phases.push(json!({
            "id": id,
            "name": format!("Step {}", id),
            "dependsOn": depends_on,
        }));
        for _ in 0..rng.random_range(1..=max_tasks.max(1)) {
            tasks.push(json!({
                "phase": id,
                "task": {"componentId": random_component(rng), "configId": random_config_id(rng)},
            }));
        }
    }
    println!("-> Generated {} legacy phase(s).", phases.len());
    (phases, tasks)
}

/// Every phase continues to the next one, optionally branching further ahead;
/// the last phase ends the flow. The first phase is the only entry.
fn generate_conditional(
    rng: &mut ThreadRng,
    count: usize,
    max_tasks: usize,
) -> (Vec<Value>, Vec<Value>) {
    let mut phases = Vec::with_capacity(count);
    let mut tasks = Vec::new();
    let mut transition = 0;
    let mut next_transition = || {
        transition += 1;
        format!("transition-{}", transition)
    };

    for index in 0..count {
        let id = format!("phase-{}", index + 1);
        let mut next = Vec::new();
        if index + 2 < count && rng.random_bool(0.3) {
            let target = rng.random_range(index + 2..count);
            next.push(json!({
                "id": next_transition(),
                "name": "Skip ahead on failure",
                "condition": {
                    "type": "phase",
                    "phase": id,
                    "operator": "EQUALS",
                    "value": "error",
                },
                "goto": format!("phase-{}", target + 1),
            }));
        }
        let goto = if index + 1 < count {
            Value::String(format!("phase-{}", index + 2))
        } else {
            Value::Null
        };
        next.push(json!({"id": next_transition(), "goto": goto}));
        phases.push(json!({"id": id, "name": format!("Phase {}", index + 1), "next": next}));

        for task_index in 0..rng.random_range(1..=max_tasks.max(1)) {
            tasks.push(json!({
                "id": format!("{}-task-{}", id, task_index + 1),
                "name": format!("Task {} of {}", task_index + 1, id),
                "phase": id,
                "task": {
                    "type": "job",
                    "componentId": random_component(rng),
                    "configId": random_config_id(rng),
                },
            }));
        }
    }
    println!("-> Generated {} conditional phase(s).", phases.len());
    (phases, tasks)
}

fn random_component(rng: &mut ThreadRng) -> &'static str {
    COMPONENTS.choose(rng).copied().unwrap_or(COMPONENTS[0])
}

fn random_config_id(rng: &mut ThreadRng) -> String {
    rng.random_range(100_000_000u64..999_999_999).to_string()
}
