//! # flowguard - Flow Configuration Validator and Dependency-Graph Engine
//!
//! **flowguard** checks and normalises the flow configurations an MCP server
//! writes to a data platform's storage API. Two flow models are supported:
//!
//! - **Orchestrator flows** (`keboola.orchestrator`): phases form a DAG through
//!   `dependsOn` lists. Missing phase and task ids are generated.
//! - **Conditional flows** (`keboola.flow`): phases are linked by `next`
//!   transitions whose `goto` names another phase or is `null` to end the flow.
//!   A valid flow has exactly one entry phase, reaches every phase from it,
//!   has no cycles and ends somewhere.
//!
//! ## Core Workflow
//!
//! 1.  **Parse**: raw JSON phases and tasks are cloned, completed with defaults
//!     and parsed into typed records ([`flow`]).
//! 2.  **Validate**: references, duplicates, cycles, reachability and
//!     entry/exit rules are checked over a [`graph::PhaseGraph`] ([`validator`]).
//! 3.  **Build**: the typed records are serialised into the wire configuration
//!     stored by the platform ([`compiler`]).
//!
//! Validation is fail-fast. The first violation is returned as a
//! [`error::FlowError`] whose message is meant to be shown to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowguard::prelude::*;
//! use serde_json::json;
//!
//! let phases = vec![
//!     json!({"name": "Extract"}),
//!     json!({"name": "Load", "dependsOn": [1]}),
//! ];
//! let tasks = vec![
//!     json!({"phase": 1, "task": {"componentId": "keboola.ex-db-mysql", "configId": "123"}}),
//!     json!({"phase": 2, "task": {"componentId": "keboola.wr-snowflake"}}),
//! ];
//!
//! let configuration = build_and_validate_flow(&phases, &tasks, FlowType::Orchestrator)?;
//! assert_eq!(configuration["phases"][1]["dependsOn"], json!([1]));
//! assert_eq!(configuration["tasks"][0]["id"], json!(20001));
//! # Ok::<(), FlowError>(())
//! ```
//!
//! Use [`compiler::FlowCompiler::builder`] to change the id ranges or the
//! default task mode, and [`service::FlowService`] to validate and persist
//! flows through a [`store::ConfigurationStore`].

pub mod compiler;
pub mod error;
pub mod flow;
pub mod graph;
pub mod prelude;
pub mod service;
pub mod store;
pub mod validator;
