use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use stockwire_context::{TermFrequencies, chunk_terms, term_frequencies, tokenize};

/// A CLI tool to show how stockwire-context splits text into term chunks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Maximum number of terms in each chunk.
    #[arg(short, long, default_value_t = 120)]
    chunk_size: usize,
}

#[derive(Serialize)]
struct SerializableChunk {
    sequence: usize,
    term_count: usize,
    text: String,
    term_frequencies: TermFrequencies,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let content = if let Some(input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let terms = tokenize(&content);
    let chunks: Vec<SerializableChunk> = chunk_terms(&terms, args.chunk_size)
        .into_iter()
        .map(|window| {
            let text = window.text();
            SerializableChunk {
                sequence: window.sequence,
                term_count: window.terms.len(),
                term_frequencies: term_frequencies(&tokenize(&text)),
                text,
            }
        })
        .collect();

    let json_output = serde_json::to_string_pretty(&chunks)?;
    println!("{}", json_output);

    Ok(())
}
