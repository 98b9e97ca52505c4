//! Prelude module for convenient imports
//!
//! Re-exports the types needed to compile, validate and store flows.
//!
//! # Example
//!
//! ```rust
//! use flowguard::prelude::*;
//! use serde_json::json;
//!
//! let phases = vec![
//!     json!({"id": "start", "name": "Start", "next": [{"id": "t1", "goto": "end"}]}),
//!     json!({"id": "end", "name": "End", "next": [{"id": "t2", "goto": null}]}),
//! ];
//! let compiled = FlowCompiler::new(FlowType::Conditional).compile(&phases, &[])?;
//! assert_eq!(compiled.graph.entry_phases(), vec![FlowId::from("start")]);
//! # Ok::<(), FlowError>(())
//! ```

// Compilation pipeline
pub use crate::compiler::{
    CompiledFlow, CompilerOptions, FlowCompiler, FlowCompilerBuilder, build_and_validate_flow,
};
pub use crate::validator::validate;

// Flow model
pub use crate::flow::{
    ConditionalPhase, ConditionalTask, FlowDefinition, FlowId, FlowType, LegacyPhase, LegacyTask,
    TaskPayload, Transition,
};
pub use crate::graph::PhaseGraph;

// Storage and service
pub use crate::service::{FlowService, FlowSummary, FlowToolResponse};
pub use crate::store::{ConfigurationRecord, ConfigurationStore, InMemoryConfigurationStore};

// Error types
pub use crate::error::{FlowError, ServiceError, StoreError};
