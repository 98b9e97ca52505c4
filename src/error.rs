use crate::flow::FlowId;
use crate::flow::id::{join_ids, join_path};
use thiserror::Error;

/// Errors raised while assigning ids to, validating, or serialising a flow.
///
/// Every variant is a deterministic input-validation failure. Callers surface
/// the message to the client as-is and never retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Task {task_id} missing 'task' configuration")]
    MissingTaskConfiguration { task_id: FlowId },

    #[error("Task {task_id} missing componentId in task configuration")]
    MissingComponentId { task_id: FlowId },

    #[error("Invalid phase configuration: {0}")]
    InvalidPhase(String),

    #[error("Invalid task configuration: {0}")]
    InvalidTask(String),

    #[error("Invalid flow configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Phase {phase_id} depends on non-existent phase {dependency}")]
    UnknownDependency { phase_id: FlowId, dependency: FlowId },

    #[error("Task {task_id} references non-existent phase {phase}")]
    UnknownTaskPhase { task_id: FlowId, phase: FlowId },

    #[error("Transition {transition_id} of phase {phase_id} references non-existent phase {target}")]
    UnknownTransitionTarget {
        phase_id: FlowId,
        transition_id: FlowId,
        target: FlowId,
    },

    #[error("Flow contains duplicate phase IDs: {}", join_ids(.ids))]
    DuplicatePhaseIds { ids: Vec<FlowId> },

    #[error("Flow contains duplicate task IDs: {}", join_ids(.ids))]
    DuplicateTaskIds { ids: Vec<FlowId> },

    #[error("Flow contains duplicate transition IDs: {}", join_ids(.ids))]
    DuplicateTransitionIds { ids: Vec<FlowId> },

    #[error("Circular dependency detected in phases: {}", join_path(.path))]
    CircularDependency { path: Vec<FlowId> },

    #[error("Phases {} are not reachable from entry phase {entry}", join_ids(.phases))]
    UnreachablePhases { entry: FlowId, phases: Vec<FlowId> },

    #[error("Flow has no entry phase: every phase is the target of a transition")]
    NoEntryPhase,

    #[error("Flow has multiple entry phases: {}", join_ids(.phases))]
    MultipleEntryPhases { phases: Vec<FlowId> },

    #[error("Flow has no ending phases: at least one transition must have goto set to null")]
    NoEndingPhases,

    #[error("Unknown flow type '{0}', expected 'keboola.orchestrator' or 'keboola.flow'")]
    UnknownFlowType(String),
}

/// Errors reported by a configuration store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Configuration '{configuration_id}' of component '{component_id}' not found")]
    NotFound {
        component_id: String,
        configuration_id: String,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors returned by the flow service, combining validation and storage failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] FlowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Flow configuration '{0}' not found")]
    FlowNotFound(String),
}

impl ServiceError {
    /// Whether the failure was caused by the caller's input rather than infrastructure.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Validation(_) | ServiceError::FlowNotFound(_) => true,
            ServiceError::Store(StoreError::NotFound { .. }) => true,
            ServiceError::Store(StoreError::Backend(_)) => false,
        }
    }
}
