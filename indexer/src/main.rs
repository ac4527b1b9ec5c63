mod render;
mod source;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossbeam::channel::Sender;
use fts_core::ingest::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use fts_core::persist::{load_index, save_index, IndexPaths};
use fts_core::{Document, IngestConfig, IngestPipeline, InvertedIndex};
use source::{collect_inputs, load_documents, IdAllocator};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fts")]
#[command(about = "Build and query an in-memory full-text index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct IngestArgs {
    /// Number of indexing worker threads
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    /// Capacity of the queue between corpus readers and workers
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,
}

impl From<IngestArgs> for IngestConfig {
    fn from(a: IngestArgs) -> Self {
        IngestConfig { workers: a.workers, queue_capacity: a.queue_capacity }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Index corpus files (JSON/JSONL, optionally gzipped) and save the index
    Build {
        /// Input files or directories, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        input: Vec<String>,
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        #[command(flatten)]
        ingest: IngestArgs,
    },
    /// Search a saved index
    Search {
        #[arg(long, default_value = "./index")]
        index: String,
        #[arg(short, long)]
        query: String,
        /// Maximum rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Load the index if present, otherwise build and save it; then search
    Run {
        #[arg(long, value_delimiter = ',')]
        input: Vec<String>,
        #[arg(long, default_value = "./index")]
        index: String,
        #[arg(short, long, default_value = "test")]
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        ingest: IngestArgs,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, index, ingest } => {
            build_index(&input, &IndexPaths::new(index), ingest.into())?;
            Ok(())
        }
        Commands::Search { index, query, limit } => {
            let paths = IndexPaths::new(&index);
            let idx = load_index(&paths).with_context(|| format!("loading index from {index}"))?;
            search_and_print(&idx, &query, limit)
        }
        Commands::Run { input, index, query, limit, ingest } => {
            let paths = IndexPaths::new(&index);
            let idx = open_or_build(&paths, &input, ingest.into())?;
            search_and_print(&idx, &query, limit)
        }
    }
}

fn open_or_build(paths: &IndexPaths, input: &[String], config: IngestConfig) -> Result<InvertedIndex> {
    if paths.exists() {
        let start = Instant::now();
        match load_index(paths) {
            Ok(idx) => {
                tracing::info!(path = %paths.root.display(), elapsed_ms = start.elapsed().as_millis() as u64, "loaded index");
                return Ok(idx);
            }
            Err(e) => tracing::warn!(error = %e, "saved index unusable, rebuilding"),
        }
    }
    if input.is_empty() {
        bail!("no index at {} and no --input given to build one", paths.root.display());
    }
    build_index(input, paths, config)
}

fn build_index(input: &[String], paths: &IndexPaths, config: IngestConfig) -> Result<InvertedIndex> {
    let start = Instant::now();
    let index = InvertedIndex::new();
    let pipeline = IngestPipeline::new(config);
    let ids = IdAllocator::default();

    // one producer per input argument; the pipeline closes the queue once all exit
    let producers: Vec<_> = input
        .iter()
        .map(|input| {
            let ids = &ids;
            move |tx: Sender<Document>| -> Result<()> {
                let files = collect_inputs(Path::new(input));
                if files.is_empty() {
                    bail!("no corpus files found at {input}");
                }
                for file in files {
                    tracing::info!(path = %file.display(), "loading documents");
                    let sent = load_documents(&file, ids, &tx)?;
                    tracing::debug!(path = %file.display(), sent, "file loaded");
                }
                Ok(())
            }
        })
        .collect();

    let report = pipeline.run(&index, producers);
    let stats = index.size();
    tracing::info!(
        num_docs = stats.num_docs,
        num_terms = stats.num_terms,
        failed_sources = report.failed_producers,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "indexed documents"
    );
    if stats.num_docs == 0 {
        bail!("no documents were indexed");
    }

    save_index(paths, &index).with_context(|| format!("saving index to {}", paths.root.display()))?;
    Ok(index)
}

fn search_and_print(index: &InvertedIndex, query: &str, limit: Option<usize>) -> Result<()> {
    let start = Instant::now();
    let hits = index.search(query);
    tracing::info!(query, hits = hits.len(), elapsed_us = start.elapsed().as_micros() as u64, "search complete");
    let stdout = std::io::stdout();
    render::render_results(stdout.lock(), index, &hits, limit)?;
    Ok(())
}
