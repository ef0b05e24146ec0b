use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use csrwalk::{
    cap_component, generate_walks, ingest_file, read_edgelist_file, write_edgelist_file,
    write_walks_file, CsrGraph, IngestConfig, WalkConfig, WriterConfig,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Edge lists to CSR graphs to random walks")]
struct Cli {
    /// Log filter, e.g. `info` or `csrwalk=debug` (RUST_LOG wins when set)
    #[arg(long, global = true, env = "CSRWALK_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite a labelled edge list into dense ids plus a label mapping
    Ingest {
        raw: PathBuf,
        edgelist: PathBuf,
        mapping: PathBuf,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Keep only the component reachable from a seed edge
    Cap {
        edgelist: PathBuf,
        out: PathBuf,
        /// Index of the seed edge in the edge list
        #[arg(long, default_value_t = 0)]
        seed_edge: usize,
        /// Maximum number of nodes kept
        #[arg(long, default_value_t = 300_000)]
        cap: usize,
        /// Where to write the new-id -> old-id table (one id per line)
        #[arg(long)]
        ids_out: Option<PathBuf>,
    },
    /// Sample walks from a canonical edge list
    Walk {
        edgelist: PathBuf,
        walks: PathBuf,
        #[command(flatten)]
        walk: WalkArgs,
    },
    /// Ingest, build the graph, sample and write walks in one go
    Run {
        raw: PathBuf,
        out_dir: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        walk: WalkArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Leading rows of the raw file to skip
    #[arg(long, default_value_t = 0)]
    skip_rows: usize,
    /// Raw field delimiter (single byte)
    #[arg(long, default_value = "\t")]
    delimiter: String,
}

#[derive(Args, Debug)]
struct WalkArgs {
    #[arg(long, env = "CSRWALK_NUM_WALKS", default_value_t = 20)]
    num_walks: usize,
    /// Steps after the start node; each row has num_steps + 1 columns
    #[arg(long, env = "CSRWALK_NUM_STEPS", default_value_t = 29)]
    num_steps: usize,
    #[arg(long, env = "CSRWALK_SEED", default_value_t = 111413)]
    seed: u64,
    /// Worker count; 0 uses every available thread
    #[arg(long, env = "CSRWALK_THREADS", default_value_t = 0)]
    threads: usize,
}

impl InputArgs {
    fn config(&self) -> Result<IngestConfig> {
        let delimiter = match self.delimiter.as_bytes() {
            [b] => *b,
            _ => bail!("delimiter must be a single byte, got {:?}", self.delimiter),
        };
        Ok(IngestConfig { skip_rows: self.skip_rows, delimiter, ..IngestConfig::default() })
    }
}

impl WalkArgs {
    fn config(&self) -> WalkConfig {
        WalkConfig {
            num_walks: self.num_walks,
            num_steps: self.num_steps,
            seed: self.seed,
            threads: self.threads,
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {e}"))
}

fn sample_and_write(graph: &CsrGraph, walks: &Path, config: WalkConfig) -> Result<()> {
    let batch = generate_walks(graph, config).context("walk generation failed")?;
    write_walks_file(&batch, walks, WriterConfig::default())
        .with_context(|| format!("writing {}", walks.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.cmd {
        Command::Ingest { raw, edgelist, mapping, input } => {
            ingest_file(&raw, &edgelist, &mapping, input.config()?)
                .with_context(|| format!("ingesting {}", raw.display()))?;
        }
        Command::Cap { edgelist, out, seed_edge, cap, ids_out } => {
            let edges = read_edgelist_file(&edgelist)
                .with_context(|| format!("reading {}", edgelist.display()))?;
            let capped = cap_component(&edges, seed_edge, cap)?;
            write_edgelist_file(&out, &capped.edges)
                .with_context(|| format!("writing {}", out.display()))?;
            if let Some(ids_out) = ids_out {
                let lines: String = capped.original.iter().map(|id| format!("{id}\n")).collect();
                std::fs::write(&ids_out, lines)
                    .with_context(|| format!("writing {}", ids_out.display()))?;
            }
            info!(nodes = capped.node_count(), edges = capped.edges.len(), "capped component");
        }
        Command::Walk { edgelist, walks, walk } => {
            let edges = read_edgelist_file(&edgelist)
                .with_context(|| format!("reading {}", edgelist.display()))?;
            let graph = CsrGraph::from_edges(&edges);
            info!(nodes = graph.node_count(), entries = graph.entry_count(), "built csr");
            sample_and_write(&graph, &walks, walk.config())?;
        }
        Command::Run { raw, out_dir, input, walk } => {
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;
            let edgelist = out_dir.join("edgelist.txt");
            let mapping_path = out_dir.join("mapping.json");
            let (mapping, _) = ingest_file(&raw, &edgelist, &mapping_path, input.config()?)
                .with_context(|| format!("ingesting {}", raw.display()))?;

            let edges = read_edgelist_file(&edgelist)?;
            let graph = CsrGraph::with_node_count(mapping.len(), &edges)?;
            info!(nodes = graph.node_count(), entries = graph.entry_count(), "built csr");

            let config = walk.config();
            let name = format!("walks_{}x{}.csv", config.num_walks, config.num_steps + 1);
            let walks = out_dir.join(name);
            sample_and_write(&graph, &walks, config)?;
        }
    }
    Ok(())
}
