use super::{check_cycles, duplicate_ids};
use crate::error::FlowError;
use crate::flow::{LegacyPhase, LegacyTask};
use crate::graph::PhaseGraph;
use ahash::AHashSet;

/// Checks a legacy flow: unique ids, resolvable `dependsOn` and task phase
/// references, and an acyclic dependency graph.
pub fn validate_legacy_flow(
    phases: &[LegacyPhase],
    tasks: &[LegacyTask],
) -> Result<PhaseGraph, FlowError> {
    let ids = duplicate_ids(phases.iter().map(|p| p.id.clone()));
    if !ids.is_empty() {
        return Err(FlowError::DuplicatePhaseIds { ids });
    }
    let ids = duplicate_ids(tasks.iter().map(|t| t.id.clone()));
    if !ids.is_empty() {
        return Err(FlowError::DuplicateTaskIds { ids });
    }

    let declared: AHashSet<_> = phases.iter().map(|p| &p.id).collect();
    for phase in phases {
        if let Some(dependency) = phase.depends_on.iter().find(|d| !declared.contains(d)) {
            return Err(FlowError::UnknownDependency {
                phase_id: phase.id.clone(),
                dependency: dependency.clone(),
            });
        }
    }
    for task in tasks {
        if !declared.contains(&task.phase) {
            return Err(FlowError::UnknownTaskPhase {
                task_id: task.id.clone(),
                phase: task.phase.clone(),
            });
        }
    }

    let graph = PhaseGraph::from_legacy(phases);
    check_cycles(&graph)?;
    Ok(graph)
}
