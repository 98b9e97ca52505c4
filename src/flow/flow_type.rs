use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ORCHESTRATOR_COMPONENT_ID: &str = "keboola.orchestrator";
pub const CONDITIONAL_FLOW_COMPONENT_ID: &str = "keboola.flow";

/// The two flow models a configuration can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowType {
    /// Legacy sequential flows: phases ordered by `dependsOn`.
    #[serde(rename = "keboola.orchestrator", alias = "orchestrator")]
    Orchestrator,
    /// Branching flows: phases linked by `next` transitions.
    #[serde(rename = "keboola.flow", alias = "conditional")]
    Conditional,
}

impl FlowType {
    pub const ALL: [FlowType; 2] = [FlowType::Conditional, FlowType::Orchestrator];

    /// The storage component that persists configurations of this type.
    pub fn component_id(self) -> &'static str {
        match self {
            FlowType::Orchestrator => ORCHESTRATOR_COMPONENT_ID,
            FlowType::Conditional => CONDITIONAL_FLOW_COMPONENT_ID,
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component_id())
    }
}

impl FromStr for FlowType {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ORCHESTRATOR_COMPONENT_ID | "orchestrator" | "legacy" => Ok(FlowType::Orchestrator),
            CONDITIONAL_FLOW_COMPONENT_ID | "conditional" => Ok(FlowType::Conditional),
            other => Err(FlowError::UnknownFlowType(other.to_string())),
        }
    }
}
