use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

/// Searches a directed graph for a cycle, starting a depth-first traversal
/// from every node of `nodes` that has not been visited yet.
///
/// Returns the offending path with the repeated node at both ends
/// (`[a, b, a]`, or `[a, a]` for a self-loop).
pub fn find_cycle<K, C>(nodes: &[K], edges: &AHashMap<K, C>) -> Option<Vec<K>>
where
    K: Clone + Eq + Hash,
    for<'c> &'c C: IntoIterator<Item = &'c K>,
{
    let mut visited = AHashSet::new();
    let mut on_stack = AHashSet::new();

    nodes
        .iter()
        .filter_map(|node| {
            if visited.contains(node) {
                None
            } else {
                find_cycle_from(node, edges, &mut visited, &mut on_stack)
            }
        })
        .next()
}

/// One depth-first traversal rooted at `start`.
///
/// `visited` keeps every node ever entered so that nodes reachable along
/// several paths are explored once. `on_stack` holds the nodes of the current
/// path; an edge into it is a back edge and closes a cycle. The traversal uses
/// an explicit stack of `(node, targets)` frames instead of recursion.
pub fn find_cycle_from<'a, K, C>(
    start: &'a K,
    edges: &'a AHashMap<K, C>,
    visited: &mut AHashSet<K>,
    on_stack: &mut AHashSet<K>,
) -> Option<Vec<K>>
where
    K: Clone + Eq + Hash,
    for<'c> &'c C: IntoIterator<Item = &'c K>,
{
    let targets_of = move |node: &K| -> Vec<&'a K> {
        edges
            .get(node)
            .map(|targets| targets.into_iter().collect())
            .unwrap_or_default()
    };

    visited.insert(start.clone());
    on_stack.insert(start.clone());
    let mut stack: Vec<(&'a K, std::vec::IntoIter<&'a K>)> =
        vec![(start, targets_of(start).into_iter())];

    while let Some((node, targets)) = stack.last_mut() {
        let node: &'a K = *node;
        match targets.next() {
            Some(target) => {
                if on_stack.contains(target) {
                    let from = stack
                        .iter()
                        .position(|(n, _)| *n == target)
                        .unwrap_or(0);
                    let mut path: Vec<K> = stack[from..].iter().map(|(n, _)| (*n).clone()).collect();
                    path.push(target.clone());
                    return Some(path);
                }
                if visited.insert(target.clone()) {
                    on_stack.insert(target.clone());
                    stack.push((target, targets_of(target).into_iter()));
                }
            }
            None => {
                on_stack.remove(node);
                stack.pop();
            }
        }
    }

    None
}
