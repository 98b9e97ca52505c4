//! Common test utilities for building raw phases and tasks.
use serde_json::{Value, json};

/// A legacy phase with the given id and dependencies.
#[allow(dead_code)]
pub fn legacy_phase(id: Value, depends_on: Value) -> Value {
    json!({"id": id, "name": format!("Phase {}", id), "dependsOn": depends_on})
}

/// A legacy task without an id, running `component_id` in `phase`.
#[allow(dead_code)]
pub fn legacy_task(phase: Value, component_id: &str) -> Value {
    json!({"phase": phase, "task": {"componentId": component_id}})
}

/// A conditional phase whose transitions lead to `targets` (`None` ends the flow).
///
/// Transition ids are derived from the phase id so they stay unique.
#[allow(dead_code)]
pub fn conditional_phase(id: &str, targets: &[Option<&str>]) -> Value {
    let next: Vec<Value> = targets
        .iter()
        .enumerate()
        .map(|(i, goto)| json!({"id": format!("{}-t{}", id, i + 1), "goto": goto}))
        .collect();
    json!({"id": id, "name": format!("Phase {}", id), "next": next})
}

#[allow(dead_code)]
pub fn notification_task(id: &str, phase: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Notify {}", id),
        "phase": phase,
        "task": {
            "type": "notification",
            "title": "Flow update",
            "message": "Phase finished",
            "recipients": [{"channel": "email", "address": "ops@example.com"}],
        },
    })
}

#[allow(dead_code)]
pub fn job_task(id: &str, phase: &str, component_id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Run {}", component_id),
        "phase": phase,
        "task": {"type": "job", "componentId": component_id, "configId": "1234"},
    })
}

/// Sequential legacy flow: extract -> transform -> load, one task each.
#[allow(dead_code)]
pub fn simple_legacy_flow() -> (Vec<Value>, Vec<Value>) {
    let phases = vec![
        json!({"name": "Extract"}),
        json!({"name": "Transform", "dependsOn": [1]}),
        json!({"name": "Load", "dependsOn": [2]}),
    ];
    let tasks = vec![
        legacy_task(json!(1), "keboola.ex-db-mysql"),
        legacy_task(json!(2), "keboola.snowflake-transformation"),
        legacy_task(json!(3), "keboola.wr-google-sheets"),
    ];
    (phases, tasks)
}

/// Branching conditional flow: start -> (a | b) -> end.
#[allow(dead_code)]
pub fn branching_conditional_flow() -> (Vec<Value>, Vec<Value>) {
    let phases = vec![
        json!({
            "id": "start",
            "name": "Start",
            "description": "Extract everything",
            "next": [
                {
                    "id": "on-success",
                    "name": "Succeeded",
                    "condition": {"type": "phase", "phase": "start", "operator": "EQUALS", "value": "success"},
                    "goto": "a",
                },
                {"id": "otherwise", "goto": "b"},
            ],
        }),
        conditional_phase("a", &[Some("end")]),
        conditional_phase("b", &[Some("end")]),
        conditional_phase("end", &[None]),
    ];
    let tasks = vec![
        job_task("extract", "start", "keboola.ex-db-snowflake"),
        job_task("transform", "a", "keboola.snowflake-transformation"),
        notification_task("alert", "b"),
        notification_task("done", "end"),
    ];
    (phases, tasks)
}
