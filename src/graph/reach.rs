use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

/// Collects every node reachable from `start` into `visited` and returns the
/// accumulated set.
///
/// Nodes already present in `visited` are treated as explored and their
/// targets are not followed. A `start` without an entry in `edges` yields just
/// `{start}`. Cycles terminate because a node is marked before it is expanded.
pub fn reachable_ids<K, C>(
    start: &K,
    edges: &AHashMap<K, C>,
    visited: &mut AHashSet<K>,
) -> AHashSet<K>
where
    K: Clone + Eq + Hash,
    for<'c> &'c C: IntoIterator<Item = &'c K>,
{
    let mut pending = Vec::new();
    if visited.insert(start.clone()) {
        pending.push(start);
    }

    while let Some(node) = pending.pop() {
        if let Some(targets) = edges.get(node) {
            for target in targets {
                if visited.insert(target.clone()) {
                    pending.push(target);
                }
            }
        }
    }

    visited.clone()
}
