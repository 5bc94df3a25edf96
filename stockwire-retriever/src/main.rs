use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use stockwire_retriever::{
    config::RetrieverConfig,
    retrieval::{document::Document, news_index::NewsIndex},
    storage::ChunkStore,
};
use tracing_subscriber::EnvFilter;

/// A CLI tool to index and query per-symbol news chunks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base directory containing the chunk database file
    #[arg(short, long, default_value = ".")]
    base_dir: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the chunk database
    Init,
    /// Index a JSON array of documents for a symbol
    Index {
        /// Symbol the documents belong to
        #[arg(short, long)]
        symbol: String,
        /// JSON file with documents. If not provided, reads from stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Maximum number of terms per chunk
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Rank a symbol's chunks against a query
    Search {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long)]
        query: String,
        /// Maximum number of results
        #[arg(short)]
        k: Option<usize>,
        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },
    /// List stored chunks for a symbol
    List {
        #[arg(short, long)]
        symbol: String,
        /// Limit number of results
        #[arg(short, long, default_value_t = 100)]
        limit: usize,
        /// Output format
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },
    /// Show chunk counts per symbol
    Stats,
}

#[derive(Debug, Clone, PartialEq)]
enum OutputFormat {
    Summary,
    Full,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "full" => Ok(OutputFormat::Full),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {s}")),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RetrieverConfig::load(path)?,
        None => RetrieverConfig::default(),
    };

    match args.command {
        Commands::Init => {
            let index = NewsIndex::open(&args.base_dir, config).await?;
            println!("Initialized chunk database at {}", args.base_dir.display());
            if let Some(path) = index.store().db_path() {
                println!("Database location: {}", path.display());
            }
            Ok(())
        }
        Commands::Index {
            symbol,
            input,
            chunk_size,
        } => {
            let raw = if let Some(path) = input {
                std::fs::read_to_string(path)?
            } else {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            };
            let documents: Vec<Document> = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("Invalid document JSON: {e}"))?;

            let config = match chunk_size {
                Some(size) => config.with_chunk_size(size),
                None => config,
            };
            let index = NewsIndex::open(&args.base_dir, config).await?;
            let written = index.index_documents(&symbol, &documents).await?;

            println!(
                "Indexed {} documents for {} into {} chunks",
                documents.len(),
                symbol,
                written
            );
            Ok(())
        }
        Commands::Search {
            symbol,
            query,
            k,
            format,
        } => {
            let index = NewsIndex::open(&args.base_dir, config).await?;
            let k = k.unwrap_or(index.config().top_k);
            let results = index.retrieve_with(&symbol, &query, k).await?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
                OutputFormat::Summary => {
                    println!("Found {} chunks for {}:", results.len(), symbol);
                    for result in results {
                        println!(
                            "  Score: {:.4} | ID: {} | {}",
                            result.score,
                            result.id,
                            result.text.chars().take(80).collect::<String>()
                        );
                    }
                }
                OutputFormat::Full => {
                    for result in results {
                        println!("Score: {:.4}", result.score);
                        println!("Chunk ID: {}", result.id);
                        println!("Content:\n{}", result.text);
                        println!("---");
                    }
                }
            }
            Ok(())
        }
        Commands::List {
            symbol,
            limit,
            format,
        } => {
            let index = NewsIndex::open(&args.base_dir, config).await?;
            let mut chunks = index.store().list_chunks(&symbol).await?;
            chunks.truncate(limit);

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&chunks)?);
                }
                OutputFormat::Summary => {
                    println!("Found {} chunks:", chunks.len());
                    for chunk in chunks {
                        println!(
                            "  ID: {} | Terms: {} | Distinct: {} | Created: {}",
                            chunk.id,
                            chunk.term_frequencies.total(),
                            chunk.term_frequencies.len(),
                            chunk.created_at.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
                OutputFormat::Full => {
                    for chunk in chunks {
                        println!("Chunk ID: {}", chunk.id);
                        println!("Symbol: {}", chunk.symbol);
                        println!("Created: {}", chunk.created_at.to_rfc3339());
                        println!("Content:\n{}", chunk.text);
                        println!("---");
                    }
                }
            }
            Ok(())
        }
        Commands::Stats => {
            let index = NewsIndex::open(&args.base_dir, config).await?;
            let symbols = index.store().list_symbols().await?;
            let total: usize = symbols.iter().map(|(_, count)| count).sum();

            println!("Database Statistics:");
            println!("  Total chunks: {total}");
            println!("  Symbols: {}", symbols.len());
            for (symbol, count) in symbols {
                println!("    {symbol}: {count}");
            }
            Ok(())
        }
    }
}
