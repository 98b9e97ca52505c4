use super::CompilerOptions;
use crate::error::FlowError;
use crate::flow::{FlowId, LegacyPhase, LegacyTask};
use ahash::AHashSet;
use serde_json::{Map, Value};
use tracing::debug;

/// Whether an `id` field counts as absent. `null`, `0`, `""`, `false` and
/// empty containers all do.
fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(true)) => false,
    }
}

fn parse_id(value: &Value) -> Option<FlowId> {
    match value {
        Value::Number(n) => n.as_i64().map(FlowId::Int),
        Value::String(s) => Some(FlowId::Str(s.clone())),
        _ => None,
    }
}

/// Ids the caller supplied explicitly, anywhere in the list.
fn supplied_ids(items: &[Value]) -> AHashSet<FlowId> {
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|map| map.get("id"))
        .filter(|id| !is_unset(Some(id)))
        .filter_map(parse_id)
        .collect()
}

/// Assigns ids and names to raw legacy phases and parses them.
///
/// A phase at index `i` without an id gets `first_phase_id + i`, bumped past
/// every id already in use. The input is never modified.
pub fn assign_legacy_phase_ids(
    phases: &[Value],
    options: &CompilerOptions,
) -> Result<Vec<LegacyPhase>, FlowError> {
    let mut used = supplied_ids(phases);
    let mut assigned = Vec::with_capacity(phases.len());

    for (index, raw) in phases.iter().enumerate() {
        let mut data = raw.as_object().cloned().ok_or_else(|| {
            FlowError::InvalidPhase(format!("phase at index {} is not an object", index))
        })?;

        if is_unset(data.get("id")) {
            let overflow =
                || FlowError::InvalidPhase(format!("no phase id left for index {}", index));
            let mut candidate = i64::try_from(index)
                .ok()
                .and_then(|offset| options.first_phase_id.checked_add(offset))
                .ok_or_else(overflow)?;
            while used.contains(&FlowId::Int(candidate)) {
                candidate = candidate.checked_add(1).ok_or_else(overflow)?;
            }
            debug!(index, id = candidate, "Assigned phase id");
            used.insert(FlowId::Int(candidate));
            data.insert("id".to_string(), Value::from(candidate));
        }

        let id = display_id(&data);
        data.entry("name")
            .or_insert_with(|| Value::String(format!("Phase {}", id)));

        let phase: LegacyPhase = serde_json::from_value(Value::Object(data))
            .map_err(|e| FlowError::InvalidPhase(e.to_string()))?;
        if phase.name.is_empty() {
            return Err(FlowError::InvalidPhase(format!(
                "phase {} has an empty name",
                phase.id
            )));
        }
        assigned.push(phase);
    }

    Ok(assigned)
}

/// Assigns ids and names to raw legacy tasks, fills task defaults and parses
/// them.
///
/// One counter starting at `first_task_id` serves the whole list; it skips
/// every id already in use and never goes back.
pub fn assign_legacy_task_ids(
    tasks: &[Value],
    options: &CompilerOptions,
) -> Result<Vec<LegacyTask>, FlowError> {
    let mut used = supplied_ids(tasks);
    let mut counter = Some(options.first_task_id);
    let mut assigned = Vec::with_capacity(tasks.len());

    for (index, raw) in tasks.iter().enumerate() {
        let mut data = raw.as_object().cloned().ok_or_else(|| {
            FlowError::InvalidTask(format!("task at index {} is not an object", index))
        })?;

        if is_unset(data.get("id")) {
            let overflow =
                || FlowError::InvalidTask(format!("no task id left for index {}", index));
            let mut id = counter.ok_or_else(overflow)?;
            while used.contains(&FlowId::Int(id)) {
                id = id.checked_add(1).ok_or_else(overflow)?;
            }
            debug!(index, id, "Assigned task id");
            used.insert(FlowId::Int(id));
            data.insert("id".to_string(), Value::from(id));
            counter = id.checked_add(1);
        }

        let id = display_id(&data);
        data.entry("name")
            .or_insert_with(|| Value::String(format!("Task {}", id)));

        let payload = match data.get_mut("task") {
            None | Some(Value::Null) => {
                return Err(FlowError::MissingTaskConfiguration { task_id: id });
            }
            Some(Value::Object(payload)) => payload,
            Some(_) => {
                return Err(FlowError::InvalidTask(format!(
                    "task {} has a 'task' field that is not an object",
                    id
                )));
            }
        };
        fill_payload_defaults(payload, &id, options)?;

        let task: LegacyTask = serde_json::from_value(Value::Object(data))
            .map_err(|e| FlowError::InvalidTask(e.to_string()))?;
        assigned.push(task);
    }

    Ok(assigned)
}

fn fill_payload_defaults(
    payload: &mut Map<String, Value>,
    task_id: &FlowId,
    options: &CompilerOptions,
) -> Result<(), FlowError> {
    if !payload.contains_key("componentId") {
        return Err(FlowError::MissingComponentId {
            task_id: task_id.clone(),
        });
    }
    payload
        .entry("mode")
        .or_insert_with(|| Value::String(options.default_task_mode.clone()));
    normalize_config_id(payload);
    Ok(())
}

/// Storage ids are strings, but callers often pass them as numbers.
pub(crate) fn normalize_config_id(payload: &mut Map<String, Value>) {
    if let Some(Value::Number(n)) = payload.get("configId") {
        let id = n.to_string();
        payload.insert("configId".to_string(), Value::String(id));
    }
}

/// The id as it will appear in messages. Values that are not valid ids are
/// rendered verbatim so the parse error that follows still names the record.
fn display_id(data: &Map<String, Value>) -> FlowId {
    match data.get("id") {
        Some(value) => parse_id(value).unwrap_or_else(|| FlowId::Str(value.to_string())),
        None => FlowId::Str(String::new()),
    }
}
