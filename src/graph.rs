//! Minimal graph adapter trait.

use crate::NodeId;

/// A graph view that returns **borrowed** neighbor slices.
///
/// The sampler only needs this: walking never allocates per step, and any
/// `Sync` implementor can be shared by all workers without locking.
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: NodeId) -> &[NodeId];
    fn degree(&self, node: NodeId) -> usize {
        self.neighbors_ref(node).len()
    }
}
