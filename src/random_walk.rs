//! Uniform random walk generation over a read-only graph.
//!
//! The output is one flat `rows × (num_steps + 1)` buffer. Row `r` is walk number
//! `r % num_walks` starting at node `r / num_walks`. Rows are cut into `threads`
//! contiguous blocks; worker `w` owns block `w` exclusively and draws from a
//! `ChaCha8Rng` seeded with `seed + w`.

use crate::csr::CsrGraph;
use crate::graph::GraphRef;
use crate::{Error, NodeId, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::slice::ChunksExact;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Marks positions after a walk stopped at a node with no neighbors.
pub const UNSET: NodeId = NodeId::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Walks started from every node.
    pub num_walks: usize,
    /// Steps taken after the start node.
    pub num_steps: usize,
    pub seed: u64,
    /// Worker count. `0` uses every available thread.
    pub threads: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { num_walks: 10, num_steps: 3, seed: 111413, threads: 0 }
    }
}

impl WalkConfig {
    /// Single worker: output depends only on the graph, `num_walks`, `num_steps` and `seed`.
    pub fn sequential(self) -> Self {
        Self { threads: 1, ..self }
    }
}

/// Cooperative cancellation, observed between walk rows.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Dense walk table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkBatch {
    data: Vec<NodeId>,
    columns: usize,
}

impl WalkBatch {
    pub fn rows(&self) -> usize {
        self.data.len() / self.columns
    }

    /// `num_steps + 1`.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn num_steps(&self) -> usize {
        self.columns - 1
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Full row, including trailing [`UNSET`] cells.
    pub fn row(&self, r: usize) -> &[NodeId] {
        &self.data[r * self.columns..(r + 1) * self.columns]
    }

    /// Row truncated at the first [`UNSET`].
    pub fn walk(&self, r: usize) -> &[NodeId] {
        let row = self.row(r);
        let len = row.iter().position(|&v| v == UNSET).unwrap_or(row.len());
        &row[..len]
    }

    pub fn iter_rows(&self) -> ChunksExact<'_, NodeId> {
        self.data.chunks_exact(self.columns)
    }

    /// `SOURCE, STEP_0, …, STEP_{num_steps-1}`.
    pub fn header(&self) -> Vec<String> {
        crate::writer::walk_header(self.num_steps())
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<NodeId> {
        self.data
    }
}

pub fn generate_walks<G: GraphRef + Sync>(graph: &G, config: WalkConfig) -> Result<WalkBatch> {
    generate(graph, config, None)
}

/// Like [`generate_walks`], but stops with [`Error::Cancelled`] once `cancel` fires.
pub fn generate_walks_cancellable<G: GraphRef + Sync>(
    graph: &G,
    config: WalkConfig,
    cancel: &CancelToken,
) -> Result<WalkBatch> {
    generate(graph, config, Some(cancel))
}

/// Array-level entry point for callers holding raw CSR arrays.
///
/// Signed parameters follow the usual convention: `nthread < 1` means "all
/// available threads"; negative `num_steps` or `num_walks < 1` are rejected.
pub fn random_walk(
    offsets: Vec<usize>,
    neighbors: Vec<NodeId>,
    num_walks: i64,
    num_steps: i64,
    seed: u64,
    nthread: i64,
) -> Result<WalkBatch> {
    if num_walks < 1 {
        return Err(Error::InvalidParameter(format!("num_walks must be >= 1, got {num_walks}")));
    }
    if num_steps < 0 {
        return Err(Error::InvalidParameter(format!("num_steps must be >= 0, got {num_steps}")));
    }
    let to_usize = |name: &str, v: i64| {
        usize::try_from(v).map_err(|_| Error::InvalidParameter(format!("{name} too large: {v}")))
    };
    let config = WalkConfig {
        num_walks: to_usize("num_walks", num_walks)?,
        num_steps: to_usize("num_steps", num_steps)?,
        seed,
        threads: if nthread < 1 { 0 } else { to_usize("nthread", nthread)? },
    };
    let graph = CsrGraph::from_parts(offsets, neighbors)?;
    generate_walks(&graph, config)
}

fn generate<G: GraphRef + Sync>(
    graph: &G,
    config: WalkConfig,
    cancel: Option<&CancelToken>,
) -> Result<WalkBatch> {
    let n = graph.node_count();
    let (rows, columns, cells) = table_shape(n, &config)?;
    if rows == 0 {
        return Ok(WalkBatch { data: Vec::new(), columns });
    }

    let workers = worker_count(config.threads);
    let block_rows = rows.div_ceil(workers);
    let block_len = block_rows * columns;
    let started = Instant::now();

    let mut data = vec![UNSET; cells];
    let fill = |worker: usize, block: &mut [NodeId]| {
        fill_block(graph, &config, worker, worker * block_rows, block, cancel)
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let run = |data: &mut [NodeId]| {
            data.par_chunks_mut(block_len)
                .enumerate()
                .try_for_each(|(worker, block)| fill(worker, block))
        };
        if workers == 1 {
            fill(0, &mut data[..])?;
        } else if config.threads == 0 {
            run(&mut data[..])?;
        } else {
            // Blocks are seeded by index, so fewer OS threads than blocks is fine.
            let pool_threads = workers.min(rows).min(hardware_threads());
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(pool_threads)
                .build()
                .map_err(std::io::Error::other)?;
            pool.install(|| run(&mut data[..]))?;
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (worker, block) in data.chunks_mut(block_len).enumerate() {
            fill(worker, block)?;
        }
    }

    info!(
        nodes = n,
        rows,
        columns,
        workers,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated walks"
    );
    Ok(WalkBatch { data, columns })
}

/// `(rows, columns, cells)` for `n` nodes, rejecting parameters before any allocation.
fn table_shape(n: usize, config: &WalkConfig) -> Result<(usize, usize, usize)> {
    if config.num_walks < 1 {
        return Err(Error::InvalidParameter(format!(
            "num_walks must be >= 1, got {}",
            config.num_walks
        )));
    }
    if n > UNSET as usize {
        return Err(Error::InvalidParameter(format!(
            "{n} nodes do not fit below the unset marker {UNSET}"
        )));
    }
    let overflow = || {
        Error::InvalidParameter(format!(
            "{n} nodes x {} walks x {} steps overflows the walk table",
            config.num_walks, config.num_steps
        ))
    };
    let columns = config.num_steps.checked_add(1).ok_or_else(overflow)?;
    let rows = n.checked_mul(config.num_walks).ok_or_else(overflow)?;
    let cells = rows.checked_mul(columns).ok_or_else(overflow)?;
    Ok((rows, columns, cells))
}

fn worker_count(threads: usize) -> usize {
    if threads > 0 {
        return threads;
    }
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        hardware_threads()
    }
}

fn hardware_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn fill_block<G: GraphRef>(
    graph: &G,
    config: &WalkConfig,
    worker: usize,
    first_row: usize,
    block: &mut [NodeId],
    cancel: Option<&CancelToken>,
) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(worker as u64));
    let columns = config.num_steps + 1;
    for (i, row) in block.chunks_exact_mut(columns).enumerate() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(Error::Cancelled);
        }
        let start = ((first_row + i) / config.num_walks) as NodeId;
        unbiased_walk(graph, start, row, &mut rng);
    }
    debug!(worker, first_row, rows = block.len() / columns, "walk.block");
    Ok(())
}

/// Writes one walk into `row`; cells after a dead end keep their [`UNSET`] value.
fn unbiased_walk<G: GraphRef, R: Rng>(graph: &G, start: NodeId, row: &mut [NodeId], rng: &mut R) {
    row[0] = start;
    let mut curr = start;
    for slot in &mut row[1..] {
        let neighbors = graph.neighbors_ref(curr);
        if neighbors.is_empty() {
            break;
        }
        curr = neighbors[rng.random_range(0..neighbors.len())];
        *slot = curr;
    }
}
