use anyhow::{Context, Result};
use clap::Parser;
use connections_rs::WordVectors;
use connections_rs::cli::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert text word vectors into the binary cache format",
    long_about = None
)]
struct Args {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Text vectors, one `word v1 v2 ...` per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Binary cache to write
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.max(1));

    let word_vectors = WordVectors::from_file(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    word_vectors
        .save_binary(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    eprintln!(
        "Wrote {} vectors of dimension {} to {}",
        word_vectors.len(),
        word_vectors.dims(),
        args.output.display()
    );
    Ok(())
}
