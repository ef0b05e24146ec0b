//! `csrwalk`: edge lists in, uniform random walks out.
//!
//! Pipeline: raw labelled edges → [`ingest`] (dense ids + [`IdMapping`]) → [`CsrGraph`]
//! → [`generate_walks`] ([`WalkBatch`]) → [`writer`] (delimited table).
//!
//! Public invariants (must not drift):
//! - **Dense ids**: node ids are `0..n`, assigned in first-seen order by the ingestor.
//! - **Symmetric CSR**: every input edge `(u, v)` appears as `u -> v` and `v -> u`;
//!   each neighbor slice is sorted ascending.
//! - **Row layout**: walk row `r` starts at node `r / num_walks`.
//! - **Determinism**: same graph + [`WalkConfig`] (including `threads`) gives
//!   byte-identical walks. Changing `threads` may change the walks.
//!
//! Swappable (allowed to change without breaking the contract):
//! - whether worker blocks run on a rayon pool or inline (`parallel` feature)
//! - internal sort strategy of the CSR builder

pub mod cap;
pub mod csr;
pub mod edgelist;
pub mod graph;
pub mod ingest;
pub mod mapping;
pub mod random_walk;
pub mod writer;

pub use cap::{cap_component, CappedComponent};
pub use csr::CsrGraph;
pub use edgelist::{read_edgelist, read_edgelist_file, write_edgelist, write_edgelist_file};
pub use graph::GraphRef;
pub use ingest::{ingest, ingest_file, ingest_into, IngestConfig, IngestSummary};
pub use mapping::IdMapping;
pub use random_walk::{
    generate_walks, generate_walks_cancellable, random_walk, CancelToken, WalkBatch, WalkConfig,
    UNSET,
};
pub use writer::{walk_header, write_walks, write_walks_file, WriterConfig};

/// Dense node id.
pub type NodeId = u32;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input format: record {record}: {reason}")]
    InputFormat { record: u64, reason: String },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),
    #[error("walk generation cancelled")]
    Cancelled,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let record = err.position().map(|p| p.record() + 1).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(e) => Error::Io(e),
            kind => Error::InputFormat { record, reason: format!("{kind:?}") },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::InvalidMapping(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
