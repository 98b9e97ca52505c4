use super::{check_cycles, duplicate_ids};
use crate::error::FlowError;
use crate::flow::{ConditionalPhase, ConditionalTask, FlowId};
use crate::graph::PhaseGraph;
use ahash::AHashSet;

/// Checks a conditional flow.
///
/// Rules run in this order and the first failure wins:
/// duplicate ids, dangling references, reachability from the entry phase
/// (only when there is exactly one candidate), cycles, the single-entry rule,
/// and finally the existence of a transition that ends the flow.
pub fn validate_conditional_flow(
    phases: &[ConditionalPhase],
    tasks: &[ConditionalTask],
) -> Result<PhaseGraph, FlowError> {
    check_duplicates(phases, tasks)?;
    check_references(phases, tasks)?;

    let graph = PhaseGraph::from_conditional(phases);
    let entries = graph.entry_phases();

    if let [entry] = entries.as_slice() {
        let unreachable = graph.unreachable_from(entry);
        if !unreachable.is_empty() {
            return Err(FlowError::UnreachablePhases {
                entry: entry.clone(),
                phases: unreachable,
            });
        }
    }

    check_cycles(&graph)?;

    match entries.len() {
        0 => return Err(FlowError::NoEntryPhase),
        1 => {}
        _ => return Err(FlowError::MultipleEntryPhases { phases: entries }),
    }

    if !phases.iter().any(ConditionalPhase::is_terminal) {
        return Err(FlowError::NoEndingPhases);
    }

    Ok(graph)
}

fn check_duplicates(
    phases: &[ConditionalPhase],
    tasks: &[ConditionalTask],
) -> Result<(), FlowError> {
    let ids = duplicate_ids(phases.iter().map(|p| FlowId::from(&p.id)));
    if !ids.is_empty() {
        return Err(FlowError::DuplicatePhaseIds { ids });
    }
    let ids = duplicate_ids(tasks.iter().map(|t| FlowId::from(&t.id)));
    if !ids.is_empty() {
        return Err(FlowError::DuplicateTaskIds { ids });
    }
    let ids = duplicate_ids(
        phases
            .iter()
            .flat_map(|p| &p.next)
            .map(|t| FlowId::from(&t.id)),
    );
    if !ids.is_empty() {
        return Err(FlowError::DuplicateTransitionIds { ids });
    }
    Ok(())
}

fn check_references(
    phases: &[ConditionalPhase],
    tasks: &[ConditionalTask],
) -> Result<(), FlowError> {
    let declared: AHashSet<&str> = phases.iter().map(|p| p.id.as_str()).collect();

    for task in tasks {
        if !declared.contains(task.phase.as_str()) {
            return Err(FlowError::UnknownTaskPhase {
                task_id: FlowId::from(&task.id),
                phase: FlowId::from(&task.phase),
            });
        }
    }

    for phase in phases {
        for transition in &phase.next {
            if let Some(target) = &transition.goto {
                if !declared.contains(target.as_str()) {
                    return Err(FlowError::UnknownTransitionTarget {
                        phase_id: FlowId::from(&phase.id),
                        transition_id: FlowId::from(&transition.id),
                        target: FlowId::from(target),
                    });
                }
            }
        }
    }
    Ok(())
}
