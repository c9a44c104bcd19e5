//! SCRIPTURA CLI
//!
//! Runs kernel operations over ad-hoc texts or a corpus file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use scriptura::{corpus, EvictionPolicy, Kernel, KernelConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// SCRIPTURA CLI - Embedding and Similarity Kernel
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Embedding dimension
    #[arg(long, default_value_t = 256)]
    dimension: usize,

    /// Maximum entries per cache
    #[arg(long, default_value_t = 10000)]
    capacity: usize,

    /// Behavior of a full cache (lru, none)
    #[arg(long, default_value = "lru")]
    eviction: EvictionPolicy,

    /// Compute every embedding and similarity from scratch
    #[arg(long)]
    no_cache: bool,

    /// Number of scoring threads (0 = auto-detect based on CPU cores)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the embedding of a text
    Embed { text: String },

    /// Similarity between two texts
    Similarity { a: String, b: String },

    /// Rank corpus texts against a query
    Search {
        /// Corpus file, one text per line
        #[arg(short, long)]
        corpus: PathBuf,

        #[arg(short, long)]
        query: String,

        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: usize,
    },

    /// Print related texts for every corpus entry
    Graph {
        /// Corpus file, one text per line
        #[arg(short, long)]
        corpus: PathBuf,

        /// Edge threshold (defaults to 0.7)
        #[arg(short, long)]
        threshold: Option<f32>,
    },

    /// Group corpus texts into themes
    Themes {
        /// Corpus file, one text per line
        #[arg(short, long)]
        corpus: PathBuf,

        #[arg(short, long, default_value_t = 2)]
        min_size: usize,

        /// Edge threshold (defaults to 0.7)
        #[arg(short, long)]
        threshold: Option<f32>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scriptura=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = KernelConfig::default()
        .with_dimension(args.dimension)
        .with_capacity(args.capacity)
        .with_eviction(args.eviction)
        .with_cache_enabled(!args.no_cache)
        .with_workers(args.workers);

    let kernel = Kernel::new(config).context("invalid kernel configuration")?;

    match args.command {
        Command::Embed { text } => {
            let embedding = kernel.embed(&text);
            let nonzero = embedding.iter().filter(|x| **x != 0.0).count();
            println!(
                "dimension={} norm={:.6} nonzero={}",
                embedding.dim(),
                embedding.norm(),
                nonzero
            );
            let preview: Vec<String> = embedding.iter().take(8).map(|x| format!("{:.4}", x)).collect();
            println!("[{}, ...]", preview.join(", "));
        }

        Command::Similarity { a, b } => {
            println!("{:.6}", kernel.similarity(&a, &b));
        }

        Command::Search {
            corpus,
            query,
            top_k,
        } => {
            let texts = load(&corpus)?;
            for (rank, neighbor) in kernel.find_similar(&query, &texts, top_k).iter().enumerate() {
                println!("{:>3}. {:.4}  {}", rank + 1, neighbor.similarity, neighbor.text);
            }
        }

        Command::Graph { corpus, threshold } => {
            let texts = load(&corpus)?;
            let graph = kernel.build_relationship_graph(&texts, threshold);
            for (text, related) in graph.iter() {
                println!("{}", text);
                for relation in related {
                    println!("    {:.4}  {}", relation.similarity, relation.text);
                }
            }
            info!(
                texts = graph.len(),
                edges = graph.edge_count(),
                threshold = graph.threshold(),
                "Relationship graph complete"
            );
        }

        Command::Themes {
            corpus,
            min_size,
            threshold,
        } => {
            let texts = load(&corpus)?;
            let themes = kernel.discover_themes_with_threshold(&texts, min_size, threshold);
            if themes.is_empty() {
                println!("No themes with at least {} members", min_size);
            }
            for theme in &themes {
                println!("{}", theme);
                for member in &theme.members {
                    println!("    {}", member);
                }
            }
        }
    }

    info!("{}", kernel.stats());
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Vec<String>> {
    let texts = corpus::load_texts(path)?;
    if texts.is_empty() {
        anyhow::bail!("Corpus {} contains no texts", path.display());
    }
    Ok(texts)
}
