use super::CompilerOptions;
use super::ids::normalize_config_id;
use crate::error::FlowError;
use crate::flow::{ConditionalPhase, ConditionalTask};
use serde_json::Value;

/// Parses raw conditional phases. Ids are taken as given; uniqueness and
/// references are left to the validator.
pub fn parse_conditional_phases(phases: &[Value]) -> Result<Vec<ConditionalPhase>, FlowError> {
    phases
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value(raw.clone()).map_err(|e| {
                FlowError::InvalidPhase(format!("phase at index {}: {}", index, e))
            })
        })
        .collect()
}

/// Parses raw conditional tasks, filling the job `mode` default and turning
/// numeric `configId`s into strings first.
pub fn parse_conditional_tasks(
    tasks: &[Value],
    options: &CompilerOptions,
) -> Result<Vec<ConditionalTask>, FlowError> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut data = raw.clone();
            if let Some(payload) = data.get_mut("task").and_then(Value::as_object_mut) {
                if payload.get("type").and_then(Value::as_str) == Some("job") {
                    payload
                        .entry("mode")
                        .or_insert_with(|| Value::String(options.default_task_mode.clone()));
                    normalize_config_id(payload);
                }
            }
            serde_json::from_value(data).map_err(|e| {
                FlowError::InvalidTask(format!("task at index {}: {}", index, e))
            })
        })
        .collect()
}
