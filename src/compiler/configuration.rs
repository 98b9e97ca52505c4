use crate::error::FlowError;
use crate::flow::FlowDefinition;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct WireConfiguration<'a, P, T> {
    phases: &'a [P],
    tasks: &'a [T],
}

/// Serialises a flow into the `{"phases": [...], "tasks": [...]}` document
/// stored as the configuration's parameters.
///
/// Pure and deterministic: the same definition always yields the same value.
pub fn build_configuration(definition: &FlowDefinition) -> Result<Value, FlowError> {
    let value = match definition {
        FlowDefinition::Legacy { phases, tasks } => {
            serde_json::to_value(WireConfiguration {
                phases: phases.as_slice(),
                tasks: tasks.as_slice(),
            })
        }
        FlowDefinition::Conditional { phases, tasks } => {
            serde_json::to_value(WireConfiguration {
                phases: phases.as_slice(),
                tasks: tasks.as_slice(),
            })
        }
    };
    value.map_err(|e| FlowError::InvalidConfiguration(e.to_string()))
}
