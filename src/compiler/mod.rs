//! Turns raw phase and task objects into a validated wire configuration.
//!
//! The pipeline is: id assignment (legacy) or typed parsing (conditional),
//! then the validator, then the configuration builder. Every stage is pure;
//! the caller's JSON is cloned, never modified.

use crate::error::FlowError;
use crate::flow::{FlowDefinition, FlowType};
use crate::graph::PhaseGraph;
use crate::validator;
use serde_json::Value;
use tracing::{debug, info};

mod configuration;
pub mod ids;
pub mod parsing;

pub use configuration::build_configuration;
pub use ids::{assign_legacy_phase_ids, assign_legacy_task_ids};
pub use parsing::{parse_conditional_phases, parse_conditional_tasks};

pub const DEFAULT_FIRST_PHASE_ID: i64 = 1;
pub const DEFAULT_FIRST_TASK_ID: i64 = 20001;
pub const DEFAULT_TASK_MODE: &str = "run";

/// Defaults used when filling in what the caller left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// First candidate for generated legacy phase ids, offset by the phase index.
    pub first_phase_id: i64,
    /// Start of the counter for generated legacy task ids.
    pub first_task_id: i64,
    /// `mode` written into job payloads that have none.
    pub default_task_mode: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            first_phase_id: DEFAULT_FIRST_PHASE_ID,
            first_task_id: DEFAULT_FIRST_TASK_ID,
            default_task_mode: DEFAULT_TASK_MODE.to_string(),
        }
    }
}

/// The result of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledFlow {
    pub definition: FlowDefinition,
    pub graph: PhaseGraph,
    pub configuration: Value,
}

pub struct FlowCompiler {
    flow_type: FlowType,
    options: CompilerOptions,
}

pub struct FlowCompilerBuilder {
    flow_type: FlowType,
    options: CompilerOptions,
}

impl FlowCompilerBuilder {
    pub fn new(flow_type: FlowType) -> Self {
        Self {
            flow_type,
            options: CompilerOptions::default(),
        }
    }
    pub fn with_first_phase_id(mut self, id: i64) -> Self {
        self.options.first_phase_id = id;
        self
    }
    pub fn with_first_task_id(mut self, id: i64) -> Self {
        self.options.first_task_id = id;
        self
    }
    pub fn with_default_task_mode(mut self, mode: &str) -> Self {
        self.options.default_task_mode = mode.to_string();
        self
    }
    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }
    pub fn build(self) -> FlowCompiler {
        FlowCompiler {
            flow_type: self.flow_type,
            options: self.options,
        }
    }
}

impl FlowCompiler {
    pub fn builder(flow_type: FlowType) -> FlowCompilerBuilder {
        FlowCompilerBuilder::new(flow_type)
    }

    pub fn new(flow_type: FlowType) -> Self {
        Self::builder(flow_type).build()
    }

    pub fn flow_type(&self) -> FlowType {
        self.flow_type
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Assigns ids (legacy) or parses (conditional) without validating.
    pub fn parse(&self, phases: &[Value], tasks: &[Value]) -> Result<FlowDefinition, FlowError> {
        match self.flow_type {
            FlowType::Orchestrator => Ok(FlowDefinition::Legacy {
                phases: assign_legacy_phase_ids(phases, &self.options)?,
                tasks: assign_legacy_task_ids(tasks, &self.options)?,
            }),
            FlowType::Conditional => Ok(FlowDefinition::Conditional {
                phases: parse_conditional_phases(phases)?,
                tasks: parse_conditional_tasks(tasks, &self.options)?,
            }),
        }
    }

    /// Runs the full pipeline and stops at the first violation.
    pub fn compile(&self, phases: &[Value], tasks: &[Value]) -> Result<CompiledFlow, FlowError> {
        let definition = self.parse(phases, tasks)?;
        let graph = validator::validate(&definition)?;
        debug!(
            phases = definition.phase_count(),
            tasks = definition.task_count(),
            edges = graph.edge_count(),
            "Flow graph validated"
        );
        let configuration = build_configuration(&definition)?;
        info!(flow_type = %self.flow_type, "Flow configuration built");
        Ok(CompiledFlow {
            definition,
            graph,
            configuration,
        })
    }
}

/// Assigns ids, validates and serialises a flow with the default options.
///
/// Returns the wire configuration (`{"phases": [...], "tasks": [...]}`) or
/// the first violation found.
pub fn build_and_validate_flow(
    phases: &[Value],
    tasks: &[Value],
    flow_type: FlowType,
) -> Result<Value, FlowError> {
    FlowCompiler::new(flow_type)
        .compile(phases, tasks)
        .map(|compiled| compiled.configuration)
}
