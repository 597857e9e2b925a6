use anyhow::{Context, Result, bail};
use clap::Parser;
use connections_rs::cli::{GroupingArgs, init_logging};
use connections_rs::{Grouper, GroupingConfig, WordVectors};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Split words into groups of four", long_about = None)]
struct Cli {
    /// Word vectors, text or binary cache
    #[arg(long, default_value = "vectors.txt")]
    vectors: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    grouping: GroupingArgs,

    /// Words to group (if not provided, reads whitespace-separated words from stdin)
    #[arg(value_name = "WORD")]
    words: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let words = if cli.words.is_empty() {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        s.split_whitespace().map(str::to_string).collect()
    } else {
        cli.words
    };
    if words.is_empty() {
        bail!("no words to group");
    }

    let word_vectors = WordVectors::open(&cli.vectors)
        .with_context(|| format!("loading word vectors from {}", cli.vectors.display()))?;
    let grouper = Grouper::new(&word_vectors, GroupingConfig::from(&cli.grouping))?;

    for group in grouper.group(&words)? {
        println!("{group}");
    }
    Ok(())
}
