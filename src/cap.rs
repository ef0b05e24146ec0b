//! Optional preprocessing: shrink a graph to the component around a seed edge.
//!
//! Nodes are discovered breadth-first from the seed edge's endpoints over the
//! undirected adjacency and renumbered in discovery order until `cap` nodes are
//! kept. A single pass over the edge list then keeps every edge whose endpoints
//! both survived.

use crate::csr::CsrGraph;
use crate::{Error, NodeId, Result};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedComponent {
    /// Surviving edges in input order, renumbered, first occurrence only.
    pub edges: Vec<(NodeId, NodeId)>,
    /// `original[new_id]` is the id the node had in the input.
    pub original: Vec<NodeId>,
}

impl CappedComponent {
    pub fn node_count(&self) -> usize {
        self.original.len()
    }
}

pub fn cap_component(
    edges: &[(NodeId, NodeId)],
    seed_edge: usize,
    cap: usize,
) -> Result<CappedComponent> {
    let &(a, b) = edges.get(seed_edge).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "seed edge {seed_edge} out of range for {} edges",
            edges.len()
        ))
    })?;
    if cap < 2 {
        return Err(Error::InvalidParameter(format!("cap must be >= 2, got {cap}")));
    }

    let graph = CsrGraph::from_edges(edges);
    let mut new_id: Vec<NodeId> = vec![NodeId::MAX; graph.node_count()];
    let mut original: Vec<NodeId> = Vec::new();
    let mut frontier: VecDeque<NodeId> = VecDeque::new();

    let mut visit = |u: NodeId, original: &mut Vec<NodeId>, frontier: &mut VecDeque<NodeId>| {
        if new_id[u as usize] == NodeId::MAX && original.len() < cap {
            new_id[u as usize] = original.len() as NodeId;
            original.push(u);
            frontier.push_back(u);
        }
    };

    visit(a, &mut original, &mut frontier);
    visit(b, &mut original, &mut frontier);
    while let Some(u) = frontier.pop_front() {
        if original.len() >= cap {
            break;
        }
        for &v in graph.neighbors_of(u) {
            visit(v, &mut original, &mut frontier);
        }
    }

    let mut seen: HashSet<(NodeId, NodeId)> = HashSet::new();
    let kept: Vec<(NodeId, NodeId)> = edges
        .iter()
        .filter_map(|&(u, v)| {
            let (nu, nv) = (new_id[u as usize], new_id[v as usize]);
            (nu != NodeId::MAX && nv != NodeId::MAX).then_some((nu, nv))
        })
        .filter(|e| seen.insert(*e))
        .collect();

    debug!(
        seed_edge,
        cap,
        nodes = original.len(),
        edges = kept.len(),
        "cap.component"
    );
    Ok(CappedComponent { edges: kept, original })
}
