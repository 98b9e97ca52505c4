//! Tests for building and validating legacy (orchestrator) flows.
mod common;
use common::*;
use flowguard::prelude::*;
use serde_json::{Value, json};

fn build(phases: &[Value], tasks: &[Value]) -> Result<Value, FlowError> {
    build_and_validate_flow(phases, tasks, FlowType::Orchestrator)
}

#[test]
fn test_simple_flow_builds() {
    let (phases, tasks) = simple_legacy_flow();
    let configuration = build(&phases, &tasks).expect("flow should be valid");

    let built_phases = configuration["phases"].as_array().unwrap();
    let built_tasks = configuration["tasks"].as_array().unwrap();
    assert_eq!(built_phases.len(), 3);
    assert_eq!(built_tasks.len(), 3);
    assert_eq!(built_phases[2]["dependsOn"], json!([2]));
    assert_eq!(built_tasks[1]["id"], json!(20002));
    assert_eq!(built_tasks[1]["phase"], json!(2));
}

#[test]
fn test_dependency_on_missing_phase() {
    let err = build(&[json!({"dependsOn": [99]})], &[]).unwrap_err();
    assert!(err.to_string().contains("depends on non-existent phase 99"));
    assert_eq!(
        err,
        FlowError::UnknownDependency {
            phase_id: FlowId::Int(1),
            dependency: FlowId::Int(99)
        }
    );
}

#[test]
fn test_task_in_missing_phase() {
    let phases = vec![legacy_phase(json!(1), json!([]))];
    let tasks = vec![json!({"id": 1, "name": "Task", "phase": 999, "task": {"componentId": "c"}})];
    let err = build(&phases, &tasks).unwrap_err();
    assert_eq!(err.to_string(), "Task 1 references non-existent phase 999");
}

#[test]
fn test_string_and_integer_ids_are_distinct() {
    let phases = vec![
        legacy_phase(json!(1), json!([])),
        json!({"id": "2", "name": "Two", "dependsOn": ["1"]}),
    ];
    let err = build(&phases, &[]).unwrap_err();
    assert_eq!(err.to_string(), "Phase 2 depends on non-existent phase 1");
}

#[test]
fn test_duplicate_phase_ids() {
    let phases = vec![
        legacy_phase(json!(1), json!([])),
        legacy_phase(json!(1), json!([])),
    ];
    let err = build(&phases, &[]).unwrap_err();
    assert!(err.to_string().contains("duplicate phase IDs"));
}

#[test]
fn test_duplicate_task_ids() {
    let phases = vec![legacy_phase(json!(1), json!([]))];
    let tasks = vec![
        json!({"id": 5, "phase": 1, "task": {"componentId": "a"}}),
        json!({"id": 5, "phase": 1, "task": {"componentId": "b"}}),
    ];
    let err = build(&phases, &tasks).unwrap_err();
    assert_eq!(err, FlowError::DuplicateTaskIds { ids: vec![FlowId::Int(5)] });
}

#[test]
fn test_direct_circular_dependency() {
    let phases = vec![
        legacy_phase(json!(1), json!([2])),
        legacy_phase(json!(2), json!([1])),
    ];
    let err = build(&phases, &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Circular dependency detected in phases: 1 -> 2 -> 1"
    );
}

#[test]
fn test_indirect_circular_dependency() {
    let phases = vec![
        legacy_phase(json!(1), json!([3])),
        legacy_phase(json!(2), json!([1])),
        legacy_phase(json!(3), json!([2])),
    ];
    let err = build(&phases, &[]).unwrap_err();
    assert!(err.to_string().contains("Circular dependency detected"));
    let FlowError::CircularDependency { path } = err else {
        panic!("expected a cycle");
    };
    assert_eq!(path.first(), path.last());
    assert_eq!(path.len(), 4);
}

#[test]
fn test_self_referencing_dependency() {
    let err = build(&[legacy_phase(json!(1), json!([1]))], &[]).unwrap_err();
    assert_eq!(
        err,
        FlowError::CircularDependency {
            path: vec![FlowId::Int(1), FlowId::Int(1)]
        }
    );
}

#[test]
fn test_diamond_is_valid() {
    let phases = vec![
        legacy_phase(json!(1), json!([])),
        legacy_phase(json!(2), json!([1])),
        legacy_phase(json!(3), json!([1])),
        legacy_phase(json!(4), json!([2, 3])),
        legacy_phase(json!(5), json!([4])),
    ];
    let tasks: Vec<Value> = (1..=5).map(|phase| legacy_task(json!(phase), "c")).collect();
    let compiled = FlowCompiler::new(FlowType::Orchestrator)
        .compile(&phases, &tasks)
        .expect("diamond should be valid");

    let order = compiled.graph.topological_order().unwrap();
    let position = |id: i64| order.iter().position(|x| *x == FlowId::Int(id)).unwrap();
    assert!(position(1) < position(2));
    assert!(position(3) < position(4));
    assert!(position(4) < position(5));
}

#[test]
fn test_missing_task_configuration() {
    let phases = vec![legacy_phase(json!(1), json!([]))];
    let err = build(&phases, &[json!({"name": "Bad", "phase": 1})]).unwrap_err();
    assert!(err.to_string().contains("missing 'task' configuration"));
}

#[test]
fn test_empty_flow_is_valid() {
    let configuration = build(&[], &[]).unwrap();
    assert_eq!(configuration, json!({"phases": [], "tasks": []}));
}

#[test]
fn test_wire_format_uses_camel_case() {
    let phases = vec![
        json!({"name": "A"}),
        json!({"name": "B", "depends_on": [1]}),
    ];
    let tasks = vec![json!({"phase": 2, "continue-on-failure": true, "task": {"componentId": "c"}})];
    let configuration = build(&phases, &tasks).unwrap();

    assert_eq!(
        configuration["phases"][1],
        json!({
            "id": 2,
            "name": "B",
            "description": "",
            "dependsOn": [1],
            "behavior": {"onError": "stop"},
            "childBehavior": {"onError": "stop"},
        })
    );
    assert_eq!(
        configuration["tasks"][0],
        json!({
            "id": 20001,
            "name": "Task 20001",
            "phase": 2,
            "enabled": true,
            "continueOnFailure": true,
            "task": {"componentId": "c", "mode": "run"},
            "behavior": {"onError": "stop"},
        })
    );
}
