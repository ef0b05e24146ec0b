//! Streaming edge-list ingestion: labelled rows in, dense integer rows out.
//!
//! Each record is resolved and written before the next one is read, so memory
//! stays proportional to the number of distinct labels, not the number of edges.

use crate::mapping::IdMapping;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Leading rows to drop before the first edge (file preamble).
    pub skip_rows: usize,
    /// Field separator of the raw input.
    pub delimiter: u8,
    /// Quote character of the raw input.
    pub quote: u8,
    /// Field separator of the canonical edge list.
    pub output_delimiter: u8,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { skip_rows: 0, delimiter: b'\t', quote: b'|', output_delimiter: b' ' }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Rows dropped by `skip_rows`.
    pub skipped: u64,
    /// Edges written.
    pub edges: u64,
    /// Distinct labels in the mapping after ingestion.
    pub nodes: usize,
}

/// Ingest into a fresh mapping.
pub fn ingest<R: Read, W: Write>(
    reader: R,
    writer: W,
    config: IngestConfig,
) -> Result<(IdMapping, IngestSummary)> {
    let mut mapping = IdMapping::new();
    let summary = ingest_into(reader, writer, config, &mut mapping)?;
    Ok((mapping, summary))
}

/// Ingest, extending an existing mapping (labels already present keep their ids).
///
/// Every physical line is one row: blank lines count toward `skip_rows` and are
/// rejected after it. On error, rows before the failing one have already been written.
pub fn ingest_into<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    config: IngestConfig,
    mapping: &mut IdMapping,
) -> Result<IngestSummary> {
    let mut reader = BufReader::new(reader);
    let mut parser = csv::ReaderBuilder::new();
    parser
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter)
        .quote(config.quote);

    let sep = config.output_delimiter as char;
    let mut summary = IngestSummary::default();
    let mut line = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut record_no = 0u64;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        record_no += 1;
        if summary.skipped < config.skip_rows as u64 {
            summary.skipped += 1;
            continue;
        }
        let content = trim_line_end(&line);
        if content.is_empty() {
            return Err(Error::InputFormat {
                record: record_no,
                reason: "expected 2 fields, found an empty row".into(),
            });
        }
        parser
            .from_reader(content)
            .read_record(&mut record)
            .map_err(|err| at_record(err, record_no))?;
        if record.len() != 2 {
            return Err(Error::InputFormat {
                record: record_no,
                reason: format!("expected 2 fields, found {}: {:?}", record.len(), record),
            });
        }
        let source = mapping.get_or_insert(&record[0])?;
        let target = mapping.get_or_insert(&record[1])?;
        writeln!(writer, "{source}{sep}{target}")?;
        summary.edges += 1;
    }
    writer.flush()?;

    summary.nodes = mapping.len();
    debug!(
        skipped = summary.skipped,
        edges = summary.edges,
        nodes = summary.nodes,
        "ingest.done"
    );
    Ok(summary)
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Re-anchor a single-line parse error to its row in the whole input.
fn at_record(err: csv::Error, record: u64) -> Error {
    match Error::from(err) {
        Error::InputFormat { reason, .. } => Error::InputFormat { record, reason },
        other => other,
    }
}

/// File-to-file ingestion; the mapping is persisted to `mapping_path` on success.
pub fn ingest_file(
    input: impl AsRef<Path>,
    edgelist_path: impl AsRef<Path>,
    mapping_path: impl AsRef<Path>,
    config: IngestConfig,
) -> Result<(IdMapping, IngestSummary)> {
    let input = input.as_ref();
    let reader = File::open(input)?;
    let writer = BufWriter::new(File::create(edgelist_path.as_ref())?);
    let (mapping, summary) = ingest(reader, writer, config)?;
    mapping.save(mapping_path)?;
    info!(
        input = %input.display(),
        edges = summary.edges,
        nodes = summary.nodes,
        "ingested edge list"
    );
    Ok((mapping, summary))
}
