use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A phase of a conditional flow. Control leaves the phase through one of its
/// `next` transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalPhase {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfiguration>,
    #[serde(default)]
    pub next: Vec<Transition>,
}

impl ConditionalPhase {
    /// Targets of all transitions that lead to another phase.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.next.iter().filter_map(|t| t.goto.as_deref())
    }

    /// Whether any transition of this phase ends the flow.
    pub fn is_terminal(&self) -> bool {
        self.next.iter().any(|t| t.goto.is_none())
    }
}

/// An outgoing edge of a conditional phase. `goto: None` ends the flow and is
/// always serialised as an explicit `null`. The key itself is required, so a
/// misspelled `goto` is an error rather than an exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(deserialize_with = "required_nullable")]
    pub goto: Option<String>,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

/// A transition condition. Conditions are evaluated by the platform, not by
/// this crate, so the object is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(pub Value);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_on: Option<Vec<RetryCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_params: Option<RetryStrategyParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryCondition {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryStrategyParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
}

/// A task of a conditional flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalTask {
    pub id: String,
    pub name: String,
    pub phase: String,
    pub task: TaskPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "continue_on_failure"
    )]
    pub continue_on_failure: Option<bool>,
}

/// What a conditional task does, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskPayload {
    Job(JobTask),
    Notification(NotificationTask),
    Variable(VariableTask),
}

impl TaskPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            TaskPayload::Job(_) => "job",
            TaskPayload::Notification(_) => "notification",
            TaskPayload::Variable(_) => "variable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTask {
    pub component_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfiguration>,
}

/// A notification sent when the phase runs. Channel and recipient fields have
/// had several shapes over time and are preserved as given in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

fn default_mode() -> String {
    "run".to_string()
}
