//! Tests for the flow service on top of the in-memory store.
mod common;
use common::*;
use flowguard::prelude::*;
use serde_json::json;
use tokio_test::block_on;

fn service() -> FlowService<InMemoryConfigurationStore> {
    FlowService::new(InMemoryConfigurationStore::new())
}

#[test]
fn test_create_legacy_flow() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();

    let response = block_on(service.create_flow("ETL", "Nightly load", &phases, &tasks)).unwrap();
    assert!(response.success);
    assert_eq!(response.description, "Nightly load");
    assert_eq!(response.version, 1);

    let record = block_on(
        service
            .store()
            .get(FlowType::Orchestrator.component_id(), &response.flow_id),
    )
    .unwrap();
    assert_eq!(record.name, "ETL");
    assert_eq!(record.configuration["tasks"][0]["id"], json!(20001));
}

#[test]
fn test_invalid_flow_is_not_stored() {
    let service = service();
    let phases = vec![json!({"id": 1, "name": "A", "dependsOn": [1]})];

    let err = block_on(service.create_flow("Broken", "", &phases, &[])).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(FlowError::CircularDependency { .. })
    ));
    assert!(err.is_client_error());
    assert!(block_on(service.store().is_empty()));
}

#[test]
fn test_create_conditional_flow_and_get() {
    let service = service();
    let (phases, tasks) = branching_conditional_flow();

    let response =
        block_on(service.create_conditional_flow("Branching", "Two paths", &phases, &tasks))
            .unwrap();
    let flow = block_on(service.get_flow(&response.flow_id)).unwrap();

    assert_eq!(flow.flow_type, FlowType::Conditional);
    assert_eq!(flow.name, "Branching");
    assert_eq!(flow.definition.phase_count(), 4);
    assert_eq!(flow.definition.task_count(), 4);
}

#[test]
fn test_get_flow_finds_legacy_flows() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();
    let response = block_on(service.create_flow("ETL", "", &phases, &tasks)).unwrap();

    let flow = block_on(service.get_flow(&response.flow_id)).unwrap();
    assert_eq!(flow.flow_type, FlowType::Orchestrator);
    assert!(matches!(flow.definition, FlowDefinition::Legacy { .. }));
}

#[test]
fn test_get_missing_flow() {
    let err = block_on(service().get_flow("404")).unwrap_err();
    assert_eq!(err, ServiceError::FlowNotFound("404".to_string()));
    assert_eq!(err.to_string(), "Flow configuration '404' not found");
}

#[test]
fn test_update_flow_bumps_version() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();
    let created = block_on(service.create_flow("ETL", "v1", &phases, &tasks)).unwrap();

    let phases = vec![json!({"name": "Extract"})];
    let tasks = vec![legacy_task(json!(1), "keboola.ex-db-mysql")];
    let updated = block_on(service.update_flow(
        FlowType::Orchestrator,
        &created.flow_id,
        "ETL",
        "v2",
        "Drop load phase",
        &phases,
        &tasks,
    ))
    .unwrap();

    assert_eq!(updated.flow_id, created.flow_id);
    assert_eq!(updated.version, 2);
    let record = block_on(
        service
            .store()
            .get(FlowType::Orchestrator.component_id(), &created.flow_id),
    )
    .unwrap();
    assert_eq!(record.change_description, "Drop load phase");
    assert_eq!(record.configuration["phases"].as_array().unwrap().len(), 1);
}

#[test]
fn test_update_with_wrong_type_is_not_found() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();
    let created = block_on(service.create_flow("ETL", "", &phases, &tasks)).unwrap();

    let (phases, tasks) = branching_conditional_flow();
    let err = block_on(service.update_flow(
        FlowType::Conditional,
        &created.flow_id,
        "ETL",
        "",
        "switch",
        &phases,
        &tasks,
    ))
    .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound { .. })));
    assert!(err.is_client_error());
}

#[test]
fn test_list_flows_summarises_both_types() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();
    block_on(service.create_flow("Legacy", "", &phases, &tasks)).unwrap();
    let (phases, tasks) = branching_conditional_flow();
    block_on(service.create_conditional_flow("Conditional", "", &phases, &tasks)).unwrap();

    let summaries = block_on(service.list_flows(&[])).unwrap();
    assert_eq!(summaries.len(), 2);

    let conditional = &summaries[0];
    assert_eq!(conditional.flow_type, FlowType::Conditional);
    assert_eq!(conditional.name, "Conditional");
    assert_eq!(conditional.phases_count, 4);

    let legacy = &summaries[1];
    assert_eq!(legacy.flow_type, FlowType::Orchestrator);
    assert_eq!(legacy.tasks_count, 3);
}

#[test]
fn test_list_flows_by_id_skips_unknown() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();
    let legacy = block_on(service.create_flow("Legacy", "", &phases, &tasks)).unwrap();
    let (phases, tasks) = branching_conditional_flow();
    let conditional =
        block_on(service.create_conditional_flow("Conditional", "", &phases, &tasks)).unwrap();

    let ids = vec![
        legacy.flow_id.clone(),
        "404".to_string(),
        conditional.flow_id.clone(),
    ];
    let summaries = block_on(service.list_flows(&ids)).unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].configuration_id, legacy.flow_id);
    assert_eq!(summaries[0].flow_type, FlowType::Orchestrator);
    assert_eq!(summaries[1].configuration_id, conditional.flow_id);
    assert_eq!(summaries[1].flow_type, FlowType::Conditional);
}

#[test]
fn test_store_ids_are_sequential() {
    let store = InMemoryConfigurationStore::new();
    let first = block_on(store.create("keboola.flow", "a", "", json!({}))).unwrap();
    let second = block_on(store.create("keboola.orchestrator", "b", "", json!({}))).unwrap();
    assert_eq!(first.configuration_id, "1");
    assert_eq!(second.configuration_id, "2");
    assert_eq!(block_on(store.list("keboola.flow")).unwrap().len(), 1);
    assert_eq!(block_on(store.len()), 2);
}

#[test]
fn test_response_serialises_with_flow_id() {
    let service = service();
    let (phases, tasks) = simple_legacy_flow();
    let response = block_on(service.create_flow("ETL", "desc", &phases, &tasks)).unwrap();

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["flow_id"], json!(response.flow_id));
    assert_eq!(value["success"], json!(true));
}
