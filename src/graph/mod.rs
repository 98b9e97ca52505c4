//! Graph algorithms over phase ids.
//!
//! [`find_cycle`] and [`reachable_ids`] are generic over the node type and the
//! container holding each node's targets, so they run equally on the phase
//! graph and on plain maps in tests. [`PhaseGraph`] is the flow-aware view the
//! validator builds.

mod cycle;
mod phase_graph;
mod reach;

pub use cycle::{find_cycle, find_cycle_from};
pub use phase_graph::{EdgeKind, PhaseGraph};
pub use reach::reachable_ids;
