//! Walk table serialization.
//!
//! Layout: header `SOURCE,STEP_0,...,STEP_{k-1}`, then one row per walk in
//! sampler order. [`UNSET`] cells are written as `-1`.

use crate::random_walk::{WalkBatch, UNSET};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

const UNSET_TEXT: &[u8] = b"-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    pub delimiter: u8,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

pub fn walk_header(num_steps: usize) -> Vec<String> {
    std::iter::once("SOURCE".to_string())
        .chain((0..num_steps).map(|i| format!("STEP_{i}")))
        .collect()
}

/// Writes header + rows; returns the number of walk rows written.
pub fn write_walks<W: Write>(batch: &WalkBatch, writer: W, config: WriterConfig) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(writer);
    wtr.write_record(batch.header())?;

    let columns = batch.columns();
    let mut record = csv::ByteRecord::with_capacity(columns * 8, columns);
    let mut cell: Vec<u8> = Vec::with_capacity(12);
    for row in batch.iter_rows() {
        record.clear();
        for &v in row {
            cell.clear();
            if v == UNSET {
                cell.extend_from_slice(UNSET_TEXT);
            } else {
                write!(cell, "{v}")?;
            }
            record.push_field(&cell);
        }
        wtr.write_byte_record(&record)?;
    }
    wtr.flush()?;
    Ok(batch.rows())
}

pub fn write_walks_file(
    batch: &WalkBatch,
    path: impl AsRef<Path>,
    config: WriterConfig,
) -> Result<usize> {
    let path = path.as_ref();
    // csv::Writer buffers internally.
    let rows = write_walks(batch, File::create(path)?, config)?;
    info!(path = %path.display(), rows, columns = batch.columns(), "wrote walks");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_walks, CsrGraph, WalkConfig};

    #[test]
    fn header_names_every_step() {
        assert_eq!(walk_header(0), vec!["SOURCE"]);
        assert_eq!(walk_header(3), vec!["SOURCE", "STEP_0", "STEP_1", "STEP_2"]);
    }

    #[test]
    fn isolated_node_rows_use_minus_one() {
        let g = CsrGraph::with_node_count(2, &[]).unwrap();
        let cfg = WalkConfig { num_walks: 1, num_steps: 2, seed: 0, threads: 1 };
        let batch = generate_walks(&g, cfg).unwrap();

        let mut out = Vec::new();
        let rows = write_walks(&batch, &mut out, WriterConfig::default()).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "SOURCE,STEP_0,STEP_1\n0,-1,-1\n1,-1,-1\n"
        );
    }

    #[test]
    fn delimiter_is_configurable() {
        let g = CsrGraph::from_edges(&[(0, 0)]);
        let cfg = WalkConfig { num_walks: 1, num_steps: 1, seed: 0, threads: 1 };
        let batch = generate_walks(&g, cfg).unwrap();
        let mut out = Vec::new();
        write_walks(&batch, &mut out, WriterConfig { delimiter: b'\t' }).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "SOURCE\tSTEP_0\n0\t0\n");
    }

    #[test]
    fn empty_batch_writes_header_only() {
        let batch = generate_walks(&CsrGraph::default(), WalkConfig::default()).unwrap();
        let mut out = Vec::new();
        assert_eq!(write_walks(&batch, &mut out, WriterConfig::default()).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "SOURCE,STEP_0,STEP_1,STEP_2\n");
    }
}
