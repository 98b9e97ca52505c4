//! Structural and graph checks over a parsed flow.
//!
//! Validation is fail-fast: the first violated rule is returned and nothing
//! else is reported. On success the phase graph that was checked is handed
//! back so callers can inspect it without rebuilding it.

use crate::error::FlowError;
use crate::flow::{FlowDefinition, FlowId};
use crate::graph::PhaseGraph;
use ahash::AHashSet;

mod conditional;
mod legacy;

pub use conditional::validate_conditional_flow;
pub use legacy::validate_legacy_flow;

pub fn validate(definition: &FlowDefinition) -> Result<PhaseGraph, FlowError> {
    match definition {
        FlowDefinition::Legacy { phases, tasks } => validate_legacy_flow(phases, tasks),
        FlowDefinition::Conditional { phases, tasks } => validate_conditional_flow(phases, tasks),
    }
}

/// Ids occurring more than once, each reported once, in order of first repeat.
fn duplicate_ids(ids: impl IntoIterator<Item = FlowId>) -> Vec<FlowId> {
    let mut seen = AHashSet::new();
    let mut reported = AHashSet::new();
    let mut duplicates = Vec::new();
    for id in ids {
        if !seen.insert(id.clone()) && reported.insert(id.clone()) {
            duplicates.push(id);
        }
    }
    duplicates
}

fn check_cycles(graph: &PhaseGraph) -> Result<(), FlowError> {
    match graph.find_cycle() {
        Some(path) => Err(FlowError::CircularDependency { path }),
        None => Ok(()),
    }
}
