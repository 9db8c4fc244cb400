use anyhow::{Context, Result};
use bff_core::{AcceptAll, BloomFilter, FilterOptions, IndexConfig, ShardedIndex, Verifier};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod docs;
use docs::DocStore;

#[derive(Parser)]
#[command(name = "bff", about = "bff: in-memory Bloom-filter search index")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Index a documents file and look up the given terms
    Search {
        /// One document per line: `<id>\t<term> <term> ...`
        #[arg(long)]
        docs: PathBuf,
        #[command(flatten)]
        index: IndexArgs,
        /// Return raw filter candidates instead of exact matches
        #[arg(long, default_value_t = false)]
        no_verify: bool,
        #[arg(long, default_value_t = false)]
        pretty: bool,
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// Print the bit layout of a single filter
    Debug {
        #[arg(long, default_value_t = 64)]
        bits: usize,
        #[arg(long, default_value_t = 1)]
        mappers: usize,
        /// Terms to encode before rendering
        #[arg(long)]
        add: Vec<String>,
        /// Term whose probe positions are marked
        term: String,
    },
}

#[derive(Args)]
struct IndexArgs {
    /// JSON file with `shards`, `mappers`, `filter_bits`
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    shards: Option<usize>,
    #[arg(long)]
    mappers: Option<usize>,
    #[arg(long)]
    bits: Option<usize>,
}

impl IndexArgs {
    fn resolve(&self) -> Result<IndexConfig> {
        let mut cfg = match &self.config {
            Some(p) => IndexConfig::load(p)
                .with_context(|| format!("loading config {}", p.display()))?,
            None => IndexConfig::default(),
        };
        if let Some(n) = self.shards {
            cfg.shards = n;
        }
        if let Some(n) = self.mappers {
            cfg.mappers = n;
        }
        if let Some(n) = self.bits {
            cfg.filter_bits = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Serialize)]
struct SearchReport {
    ids: Vec<u64>,
    candidates: usize,
    documents: usize,
}

fn search<V: Verifier>(
    cfg: &IndexConfig,
    store: &DocStore,
    verifier: V,
    terms: &[Vec<u8>],
) -> Result<SearchReport> {
    let index = ShardedIndex::from_config(cfg, verifier)?;
    for (id, doc_terms) in store.iter() {
        index.add(id, doc_terms);
    }
    let candidates = index.candidates(terms).len();
    let mut ids = index.lookup(terms).into_result()?;
    ids.sort_unstable();
    Ok(SearchReport { ids, candidates, documents: index.len() })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Search { docs, index, no_verify, pretty, terms } => {
            let cfg = index.resolve()?;
            let store = Arc::new(DocStore::load(&docs)?);
            tracing::info!(
                documents = store.len(),
                shards = cfg.shards,
                mappers = cfg.mappers,
                bits = cfg.filter_bits,
                "building index"
            );
            let terms: Vec<Vec<u8>> = terms.into_iter().map(String::into_bytes).collect();

            let report = if no_verify {
                search(&cfg, &store, AcceptAll, &terms)?
            } else {
                search(&cfg, &store, Arc::clone(&store), &terms)?
            };
            let out = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{out}");
        }

        Cmd::Debug { bits, mappers, add, term } => {
            let cfg = IndexConfig { shards: 1, mappers, filter_bits: bits };
            cfg.validate()?;
            let filter = BloomFilter::new(bits, FilterOptions::new().with_mappers(mappers));
            let mut data = filter.acquire();
            for t in &add {
                filter.add(&mut data, t.as_bytes());
            }
            println!("{}", filter.debug(&data, term.as_bytes()));
            println!("may_contain({term}) = {}", filter.may_contain(&data, term.as_bytes()));
        }
    }
    Ok(())
}
