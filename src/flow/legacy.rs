use super::id::FlowId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error-handling behaviour attached to legacy phases and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    pub on_error: String,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            on_error: "stop".to_string(),
        }
    }
}

/// A phase of a legacy (orchestrator) flow. Phases run once every phase in
/// `depends_on` has finished; tasks inside a phase run in parallel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPhase {
    pub id: FlowId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "depends_on", alias = "depends-on")]
    pub depends_on: Vec<FlowId>,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default, alias = "child_behavior", alias = "child-behavior")]
    pub child_behavior: Behavior,
}

/// The component invocation a legacy task performs.
///
/// Fields other than `componentId`, `configId` and `mode` are kept verbatim in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTaskPayload {
    pub component_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A task of a legacy flow, bound to exactly one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTask {
    pub id: FlowId,
    pub name: String,
    pub phase: FlowId,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(
        default,
        alias = "continue_on_failure",
        alias = "continue-on-failure"
    )]
    pub continue_on_failure: bool,
    pub task: LegacyTaskPayload,
    #[serde(default)]
    pub behavior: Behavior,
}

fn enabled_by_default() -> bool {
    true
}

fn default_mode() -> String {
    "run".to_string()
}
