use super::conditional::{ConditionalPhase, ConditionalTask};
use super::flow_type::FlowType;
use super::legacy::{LegacyPhase, LegacyTask};
use crate::error::FlowError;
use serde::Deserialize;
use serde_json::Value;

/// A flow whose phases and tasks have been parsed into typed records.
///
/// The flow model is encoded in the variant, so every stage that treats the
/// models differently has to handle both.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowDefinition {
    Legacy {
        phases: Vec<LegacyPhase>,
        tasks: Vec<LegacyTask>,
    },
    Conditional {
        phases: Vec<ConditionalPhase>,
        tasks: Vec<ConditionalTask>,
    },
}

#[derive(Deserialize)]
struct StoredConfiguration<P, T> {
    #[serde(default = "Vec::new")]
    phases: Vec<P>,
    #[serde(default = "Vec::new")]
    tasks: Vec<T>,
}

impl FlowDefinition {
    pub fn flow_type(&self) -> FlowType {
        match self {
            FlowDefinition::Legacy { .. } => FlowType::Orchestrator,
            FlowDefinition::Conditional { .. } => FlowType::Conditional,
        }
    }

    pub fn phase_count(&self) -> usize {
        match self {
            FlowDefinition::Legacy { phases, .. } => phases.len(),
            FlowDefinition::Conditional { phases, .. } => phases.len(),
        }
    }

    pub fn task_count(&self) -> usize {
        match self {
            FlowDefinition::Legacy { tasks, .. } => tasks.len(),
            FlowDefinition::Conditional { tasks, .. } => tasks.len(),
        }
    }

    /// Parses a stored wire-format configuration (`{"phases": [...], "tasks": [...]}`)
    /// back into typed records. No ids are generated and nothing is validated.
    pub fn from_configuration(
        configuration: &Value,
        flow_type: FlowType,
    ) -> Result<Self, FlowError> {
        let invalid = |e: serde_json::Error| FlowError::InvalidConfiguration(e.to_string());
        match flow_type {
            FlowType::Orchestrator => {
                let stored: StoredConfiguration<LegacyPhase, LegacyTask> =
                    serde_json::from_value(configuration.clone()).map_err(invalid)?;
                Ok(FlowDefinition::Legacy {
                    phases: stored.phases,
                    tasks: stored.tasks,
                })
            }
            FlowType::Conditional => {
                let stored: StoredConfiguration<ConditionalPhase, ConditionalTask> =
                    serde_json::from_value(configuration.clone()).map_err(invalid)?;
                Ok(FlowDefinition::Conditional {
                    phases: stored.phases,
                    tasks: stored.tasks,
                })
            }
        }
    }
}
