//! Symmetrized compressed-sparse-row adjacency.
//!
//! Built once from a canonical edge list and never mutated afterwards: there are
//! no `&mut` accessors, so a `&CsrGraph` can be handed to every walk worker.

use crate::graph::GraphRef;
use crate::{Error, NodeId, Result};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    offsets: Vec<usize>,
    neighbors: Vec<NodeId>,
}

impl CsrGraph {
    /// Build from a 0-indexed edge list; `n` is one plus the largest id seen.
    pub fn from_edges(edges: &[(NodeId, NodeId)]) -> Self {
        let n = edges
            .iter()
            .map(|&(u, v)| u.max(v) as usize + 1)
            .max()
            .unwrap_or(0);
        Self::build(n, edges)
    }

    /// Build with an explicit node count, so trailing isolated nodes are kept.
    pub fn with_node_count(n: usize, edges: &[(NodeId, NodeId)]) -> Result<Self> {
        if let Some(&(u, v)) = edges.iter().find(|&&(u, v)| u as usize >= n || v as usize >= n) {
            return Err(Error::InvalidGraph(format!(
                "edge ({u}, {v}) out of range for {n} nodes"
            )));
        }
        Ok(Self::build(n, edges))
    }

    /// Wrap externally built arrays after checking them.
    pub fn from_parts(offsets: Vec<usize>, neighbors: Vec<NodeId>) -> Result<Self> {
        let Some(&last) = offsets.last() else {
            return Err(Error::InvalidGraph("offsets must have length n + 1".into()));
        };
        if offsets[0] != 0 {
            return Err(Error::InvalidGraph(format!("offsets[0] = {}, expected 0", offsets[0])));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::InvalidGraph(format!("offsets decrease at node {i}")));
        }
        if last != neighbors.len() {
            return Err(Error::InvalidGraph(format!(
                "offsets[n] = {last} but {} neighbor entries",
                neighbors.len()
            )));
        }
        let n = offsets.len() - 1;
        if let Some(&v) = neighbors.iter().find(|&&v| v as usize >= n) {
            return Err(Error::InvalidGraph(format!("neighbor {v} out of range for {n} nodes")));
        }
        // `has_edge` binary-searches each slice.
        if let Some(u) = offsets
            .windows(2)
            .position(|w| neighbors[w[0]..w[1]].windows(2).any(|p| p[0] > p[1]))
        {
            return Err(Error::InvalidGraph(format!("neighbors of node {u} are not sorted")));
        }
        Ok(Self { offsets, neighbors })
    }

    fn build(n: usize, edges: &[(NodeId, NodeId)]) -> Self {
        // Both orientations, sorted by (source, target).
        let mut entries: Vec<(NodeId, NodeId)> = Vec::with_capacity(edges.len() * 2);
        for &(u, v) in edges {
            entries.push((u, v));
            entries.push((v, u));
        }
        entries.sort_unstable();

        let mut offsets = vec![0usize; n + 1];
        for &(u, _) in &entries {
            offsets[u as usize + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }
        let neighbors: Vec<NodeId> = entries.into_iter().map(|(_, v)| v).collect();

        debug!(nodes = n, edges = edges.len(), entries = neighbors.len(), "csr.build");
        Self { offsets, neighbors }
    }

    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of directed adjacency entries (two per undirected edge).
    pub fn entry_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Sorted neighbors of `u`.
    ///
    /// Panics if `u >= node_count()`.
    pub fn neighbors_of(&self, u: NodeId) -> &[NodeId] {
        let u = u as usize;
        &self.neighbors[self.offsets[u]..self.offsets[u + 1]]
    }

    pub fn degree(&self, u: NodeId) -> usize {
        let u = u as usize;
        self.offsets[u + 1] - self.offsets[u]
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        (u as usize) < self.node_count() && self.neighbors_of(u).binary_search(&v).is_ok()
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<NodeId>) {
        (self.offsets, self.neighbors)
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self { offsets: vec![0], neighbors: Vec::new() }
    }
}

impl GraphRef for CsrGraph {
    fn node_count(&self) -> usize {
        CsrGraph::node_count(self)
    }

    fn neighbors_ref(&self, node: NodeId) -> &[NodeId] {
        self.neighbors_of(node)
    }

    fn degree(&self, node: NodeId) -> usize {
        CsrGraph::degree(self, node)
    }
}
