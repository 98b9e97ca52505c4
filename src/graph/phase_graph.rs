use super::cycle::find_cycle;
use super::reach::reachable_ids;
use crate::flow::{ConditionalPhase, FlowDefinition, FlowId, LegacyPhase};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::collections::VecDeque;

/// What an edge of a [`PhaseGraph`] means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// `a -> b`: phase `a` depends on phase `b` (legacy `dependsOn`).
    DependsOn,
    /// `a -> b`: control passes from `a` to `b` (conditional `next[].goto`).
    Next,
}

/// Transient adjacency view over the phases of a flow.
///
/// Built during validation and for inspection only; it is never persisted.
/// Phase ids keep their declaration order so that every traversal, and
/// therefore every error message, is deterministic.
#[derive(Debug, Clone)]
pub struct PhaseGraph {
    kind: EdgeKind,
    phase_ids: Vec<FlowId>,
    edges: AHashMap<FlowId, Vec<FlowId>>,
}

impl PhaseGraph {
    pub fn from_legacy(phases: &[LegacyPhase]) -> Self {
        let mut graph = Self::empty(EdgeKind::DependsOn);
        for phase in phases {
            graph.add_phase(phase.id.clone(), phase.depends_on.iter().cloned());
        }
        graph
    }

    pub fn from_conditional(phases: &[ConditionalPhase]) -> Self {
        let mut graph = Self::empty(EdgeKind::Next);
        for phase in phases {
            graph.add_phase(
                FlowId::from(&phase.id),
                phase.targets().map(FlowId::from),
            );
        }
        graph
    }

    pub fn from_definition(definition: &FlowDefinition) -> Self {
        match definition {
            FlowDefinition::Legacy { phases, .. } => Self::from_legacy(phases),
            FlowDefinition::Conditional { phases, .. } => Self::from_conditional(phases),
        }
    }

    fn empty(kind: EdgeKind) -> Self {
        Self {
            kind,
            phase_ids: Vec::new(),
            edges: AHashMap::new(),
        }
    }

    fn add_phase(&mut self, id: FlowId, targets: impl Iterator<Item = FlowId>) {
        if !self.edges.contains_key(&id) {
            self.phase_ids.push(id.clone());
        }
        self.edges.entry(id).or_default().extend(targets);
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Declared phase ids in declaration order.
    pub fn phase_ids(&self) -> &[FlowId] {
        &self.phase_ids
    }

    pub fn contains(&self, id: &FlowId) -> bool {
        self.edges.contains_key(id)
    }

    pub fn targets(&self, id: &FlowId) -> &[FlowId] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> &AHashMap<FlowId, Vec<FlowId>> {
        &self.edges
    }

    /// All `(source, target)` pairs in declaration order, duplicates included.
    pub fn edge_list(&self) -> Vec<(FlowId, FlowId)> {
        self.phase_ids
            .iter()
            .flat_map(|id| {
                self.targets(id)
                    .iter()
                    .map(move |target| (id.clone(), target.clone()))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Number of incoming edges per declared phase. Edges pointing at
    /// undeclared ids are ignored.
    pub fn in_degrees(&self) -> AHashMap<FlowId, usize> {
        let mut degrees: AHashMap<FlowId, usize> =
            self.phase_ids.iter().map(|id| (id.clone(), 0)).collect();
        for target in self.edges.values().flatten() {
            if let Some(degree) = degrees.get_mut(target) {
                *degree += 1;
            }
        }
        degrees
    }

    /// Phases without incoming edges, in declaration order.
    pub fn entry_phases(&self) -> Vec<FlowId> {
        let degrees = self.in_degrees();
        self.phase_ids
            .iter()
            .filter(|id| degrees.get(*id) == Some(&0))
            .cloned()
            .collect()
    }

    pub fn find_cycle(&self) -> Option<Vec<FlowId>> {
        find_cycle(&self.phase_ids, &self.edges)
    }

    pub fn reachable_from(&self, start: &FlowId) -> AHashSet<FlowId> {
        let mut visited = AHashSet::new();
        reachable_ids(start, &self.edges, &mut visited)
    }

    /// Declared phases missing from the closure of `start`, in declaration order.
    pub fn unreachable_from(&self, start: &FlowId) -> Vec<FlowId> {
        let reachable = self.reachable_from(start);
        self.phase_ids
            .iter()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .collect()
    }

    /// Order in which the phases can run, computed with Kahn's algorithm.
    ///
    /// For `DependsOn` graphs a phase follows all of its dependencies; for
    /// `Next` graphs a phase follows all of its predecessors. Ties keep the
    /// declaration order. Returns `None` when the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<FlowId>> {
        let mut prerequisites: AHashMap<&FlowId, Vec<&FlowId>> =
            self.phase_ids.iter().map(|id| (id, Vec::new())).collect();
        for (source, target) in self.declared_edges() {
            let (before, after) = match self.kind {
                EdgeKind::DependsOn => (target, source),
                EdgeKind::Next => (source, target),
            };
            if let Some(list) = prerequisites.get_mut(after) {
                list.push(before);
            }
        }

        let mut pending: AHashMap<&FlowId, usize> = prerequisites
            .iter()
            .map(|(id, before)| (*id, before.iter().unique().count()))
            .collect();
        let mut dependents: AHashMap<&FlowId, Vec<&FlowId>> = AHashMap::new();
        for (after, before) in &prerequisites {
            for id in before.iter().unique() {
                dependents.entry(*id).or_default().push(*after);
            }
        }

        let mut queue: VecDeque<&FlowId> = self
            .phase_ids
            .iter()
            .filter(|id| pending.get(id) == Some(&0))
            .collect();
        let mut order = Vec::with_capacity(self.phase_ids.len());

        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            let Some(next) = dependents.get(id) else {
                continue;
            };
            let mut ready: Vec<&FlowId> = Vec::new();
            for dependent in next {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(*dependent);
                    }
                }
            }
            ready.sort_by_key(|ready_id| self.position(ready_id));
            queue.extend(ready);
        }

        (order.len() == self.phase_ids.len()).then_some(order)
    }

    /// Edges whose both ends are declared phases.
    fn declared_edges(&self) -> impl Iterator<Item = (&FlowId, &FlowId)> {
        self.phase_ids.iter().flat_map(move |source| {
            self.targets(source)
                .iter()
                .filter(move |target| self.contains(target))
                .map(move |target| (source, target))
        })
    }

    fn position(&self, id: &FlowId) -> usize {
        self.phase_ids
            .iter()
            .position(|candidate| candidate == id)
            .unwrap_or(usize::MAX)
    }
}
