//! Canonical edge list files: two 0-indexed integer ids per line, no header.
//!
//! Fields are separated by whitespace. Blank lines and lines starting with `#`
//! are skipped; anything else that is not exactly two ids is an error.

use crate::{Error, NodeId, Result, UNSET};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

pub fn read_edgelist<R: BufRead>(reader: R) -> Result<Vec<(NodeId, NodeId)>> {
    let mut edges = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let record = line_no as u64 + 1;
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(Error::InputFormat {
                record,
                reason: format!("expected 2 fields, found {}", fields.len()),
            });
        }
        let parse = |f: &str| match f.parse::<NodeId>() {
            Ok(UNSET) => Err(Error::InputFormat {
                record,
                reason: format!("node id {UNSET} is reserved as the unset marker"),
            }),
            Ok(id) => Ok(id),
            Err(e) => Err(Error::InputFormat {
                record,
                reason: format!("bad node id {f:?}: {e}"),
            }),
        };
        edges.push((parse(fields[0])?, parse(fields[1])?));
    }
    Ok(edges)
}

pub fn read_edgelist_file(path: impl AsRef<Path>) -> Result<Vec<(NodeId, NodeId)>> {
    let path = path.as_ref();
    let edges = read_edgelist(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), edges = edges.len(), "edgelist.read");
    Ok(edges)
}

pub fn write_edgelist<W: Write>(mut writer: W, edges: &[(NodeId, NodeId)]) -> Result<()> {
    for &(u, v) in edges {
        writeln!(writer, "{u} {v}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_edgelist_file(path: impl AsRef<Path>, edges: &[(NodeId, NodeId)]) -> Result<()> {
    write_edgelist(BufWriter::new(File::create(path)?), edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_comments_blanks_and_mixed_whitespace() {
        let txt = "# header\n0 1\n\n1\t2\n  2   0  \n";
        let edges = read_edgelist(txt.as_bytes()).unwrap();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn three_fields_is_an_error_with_line_number() {
        let txt = "0 1\n1 2 3\n";
        match read_edgelist(txt.as_bytes()) {
            Err(Error::InputFormat { record, .. }) => assert_eq!(record, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_id_is_an_error() {
        assert!(matches!(
            read_edgelist("a b\n".as_bytes()),
            Err(Error::InputFormat { record: 1, .. })
        ));
        assert!(read_edgelist("-1 0\n".as_bytes()).is_err());
    }

    #[test]
    fn unset_marker_is_not_a_node_id() {
        let err = read_edgelist("0 4294967295\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InputFormat { record: 1, .. }));
        assert_eq!(read_edgelist("0 4294967294\n".as_bytes()).unwrap(), vec![(0, UNSET - 1)]);
    }

    #[test]
    fn written_list_reads_back() {
        let edges = vec![(0, 1), (1, 1), (4, 2)];
        let mut buf = Vec::new();
        write_edgelist(&mut buf, &edges).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "0 1\n1 1\n4 2\n");
        assert_eq!(read_edgelist(buf.as_slice()).unwrap(), edges);
    }
}
