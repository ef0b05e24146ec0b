use csrwalk::{
    cap_component, generate_walks, ingest_file, read_edgelist_file, write_walks_file, CsrGraph,
    Error, IdMapping, IngestConfig, WalkConfig, WriterConfig,
};
use std::collections::HashSet;
use std::fs;

const RAW: &str = "\
# Undirected graph: amazon-like preamble
# Nodes: 5 Edges: 5
# FromNodeId\tToNodeId
alice\tbob
bob\tcarol
carol\talice
dave\tbob
erin\terin
";

#[test]
fn raw_edges_to_walk_file() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.tsv");
    let edgelist = dir.path().join("edgelist.txt");
    let mapping_path = dir.path().join("mapping.json");
    let walks_path = dir.path().join("walks.csv");
    fs::write(&raw, RAW).unwrap();

    let cfg = IngestConfig { skip_rows: 3, ..IngestConfig::default() };
    let (mapping, summary) = ingest_file(&raw, &edgelist, &mapping_path, cfg).unwrap();
    assert_eq!(summary.skipped, 3);
    assert_eq!(summary.edges, 5);
    assert_eq!(mapping.labels(), &["alice", "bob", "carol", "dave", "erin"]);
    assert_eq!(fs::read_to_string(&edgelist).unwrap(), "0 1\n1 2\n2 0\n3 1\n4 4\n");

    // Persisted mapping is a dense bijection.
    let loaded = IdMapping::load(&mapping_path).unwrap();
    assert_eq!(loaded, mapping);
    let ids: HashSet<u32> = loaded.labels().iter().map(|l| loaded.id(l).unwrap()).collect();
    assert_eq!(ids, (0..5).collect());

    let edges = read_edgelist_file(&edgelist).unwrap();
    let graph = CsrGraph::with_node_count(mapping.len(), &edges).unwrap();
    assert_eq!(graph.neighbors_of(1), &[0, 2, 3]);

    let wcfg = WalkConfig { num_walks: 3, num_steps: 4, seed: 111413, threads: 2 };
    let batch = generate_walks(&graph, wcfg).unwrap();
    let rows = write_walks_file(&batch, &walks_path, WriterConfig::default()).unwrap();
    assert_eq!(rows, 15);

    let mut rdr = csv::Reader::from_path(&walks_path).unwrap();
    let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    assert_eq!(header, ["SOURCE", "STEP_0", "STEP_1", "STEP_2", "STEP_3"]);

    let parsed: Vec<Vec<i64>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(|f| f.parse().unwrap()).collect())
        .collect();
    assert_eq!(parsed.len(), 15);
    for (r, row) in parsed.iter().enumerate() {
        assert_eq!(row[0], (r / 3) as i64);
        for (c, &v) in row.iter().enumerate() {
            let cell = batch.row(r)[c];
            if cell == csrwalk::UNSET {
                assert_eq!(v, -1);
            } else {
                assert_eq!(v, cell as i64);
            }
        }
        // Ids translate back to labels.
        assert!(row.iter().all(|&v| v == -1 || mapping.label(v as u32).is_some()));
    }
}

#[test]
fn malformed_raw_row_aborts_ingestion() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.tsv");
    let edgelist = dir.path().join("edgelist.txt");
    let mapping_path = dir.path().join("mapping.json");
    fs::write(&raw, "a\tb\nc\n").unwrap();

    let err = ingest_file(&raw, &edgelist, &mapping_path, IngestConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InputFormat { record: 2, .. }));
    // Rows before the failure were streamed; the mapping was never persisted.
    assert_eq!(fs::read_to_string(&edgelist).unwrap(), "0 1\n");
    assert!(!mapping_path.exists());
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingest_file(
        dir.path().join("nope.tsv"),
        dir.path().join("e.txt"),
        dir.path().join("m.json"),
        IngestConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(matches!(read_edgelist_file(dir.path().join("nope.txt")), Err(Error::Io(_))));
}

#[test]
fn capped_component_feeds_the_sampler() {
    // Two components; cap around the second one.
    let edges = [(0, 1), (1, 2), (10, 11), (11, 12), (12, 10)];
    let capped = cap_component(&edges, 2, 100).unwrap();
    assert_eq!(capped.original, vec![10, 11, 12]);

    let graph = CsrGraph::from_edges(&capped.edges);
    assert_eq!(graph.node_count(), 3);
    let cfg = WalkConfig { num_walks: 2, ..WalkConfig::default() };
    let batch = generate_walks(&graph, cfg).unwrap();
    assert_eq!(batch.rows(), 6);
    assert!(batch.as_slice().iter().all(|&v| v < 3));
}
