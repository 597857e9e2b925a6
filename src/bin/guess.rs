use anyhow::{Context, Result};
use clap::Parser;
use connections_rs::cli::{GroupingArgs, init_logging};
use connections_rs::{Grouper, GroupingConfig, TurnState, WordVectors, pick_guess};
use std::path::PathBuf;
use std::str::FromStr;

/// A comma-separated group of words given on the command line.
#[derive(Debug, Clone)]
struct WordGroup(Vec<String>);

impl FromStr for WordGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Err("expected comma-separated words".to_string());
        }
        Ok(WordGroup(words))
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pick the next guess for a word-grouping puzzle",
    long_about = None
)]
struct Cli {
    /// Word vectors, text or binary cache
    #[arg(long, default_value = "vectors.txt")]
    vectors: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// A group already confirmed, comma separated (repeatable)
    #[arg(long = "correct")]
    correct_groups: Vec<WordGroup>,

    /// An earlier guess, comma separated (repeatable)
    #[arg(long = "guessed")]
    previous_guesses: Vec<WordGroup>,

    #[arg(long, default_value_t = 0)]
    strikes: u32,

    #[arg(long)]
    one_away: bool,

    /// Error message returned for the previous guess
    #[arg(long)]
    error: Option<String>,

    #[command(flatten)]
    grouping: GroupingArgs,

    /// The puzzle's words
    #[arg(value_name = "WORD", required = true)]
    words: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let word_vectors = WordVectors::open(&cli.vectors)
        .with_context(|| format!("loading word vectors from {}", cli.vectors.display()))?;
    let grouper = Grouper::new(&word_vectors, GroupingConfig::from(&cli.grouping))?;

    let state = TurnState {
        strikes: cli.strikes,
        is_one_away: cli.one_away,
        correct_groups: cli.correct_groups.into_iter().map(|g| g.0).collect(),
        previous_guesses: cli.previous_guesses.into_iter().map(|g| g.0).collect(),
        error: cli.error,
    };

    let guess = pick_guess(&grouper, &cli.words, &state)?;
    if guess.end_turn {
        println!("No untried group left; ending turn.");
    } else {
        println!("{}", guess.words.join(" "));
    }
    Ok(())
}
