use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use connections_rs::cli::{GroupingArgs, init_logging};
use connections_rs::{
    EmbeddingProvider, Grouper, GroupingConfig, TurnState, WordVectors, pick_guess,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

const MAX_STRIKES: u32 = 4;
const MAX_INVALID_GUESSES: u32 = 7;
const GROUP_MULTIPLIERS: [f64; 4] = [1.0, 2.0, 3.0, 3.0];
const STRIKE_MULTIPLIERS: [f64; 5] = [1.0, 0.9, 0.75, 0.5, 0.25];

type Puzzle = Vec<Vec<String>>;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play puzzles from a file against the guesser and score it",
    long_about = None
)]
struct Cli {
    /// Word vectors, text or binary cache
    #[arg(long, default_value = "vectors.txt")]
    vectors: PathBuf,

    /// Puzzle file: one group per line, puzzles separated by blank or ':' lines
    #[arg(long, default_value = "puzzles.txt")]
    puzzles: PathBuf,

    /// Shuffle seed; 0 picks one from the clock
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    grouping: GroupingArgs,
}

// Read puzzles, e.g.
// : animals and colours
// dog cat mouse rabbit
// red blue green yellow
// A line containing commas is split on commas so groups may hold phrases.
fn read_puzzles(fname: &Path) -> io::Result<Vec<Puzzle>> {
    let file = fs::File::open(fname)?;
    let reader = io::BufReader::new(file);
    let mut puzzles = Vec::new();
    let mut current: Puzzle = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(':') {
            if !current.is_empty() {
                puzzles.push(std::mem::take(&mut current));
            }
            continue;
        }

        let group: Vec<String> = if line.contains(',') {
            line.split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_owned)
                .collect()
        } else {
            line.split_whitespace().map(str::to_owned).collect()
        };
        current.push(group);
    }
    if !current.is_empty() {
        puzzles.push(current);
    }

    Ok(puzzles)
}

fn sorted_upper(words: &[String]) -> Vec<String> {
    let mut v: Vec<String> = words.iter().map(|w| w.to_uppercase()).collect();
    v.sort();
    v
}

struct Outcome {
    correct: usize,
    strikes: u32,
    points: f64,
}

fn score(correct: usize, strikes: u32) -> f64 {
    let strike_mult = STRIKE_MULTIPLIERS[(strikes as usize).min(STRIKE_MULTIPLIERS.len() - 1)];
    GROUP_MULTIPLIERS.iter().take(correct).map(|g| g * strike_mult).sum()
}

fn play<P: EmbeddingProvider>(
    grouper: &Grouper<P>,
    puzzle: &Puzzle,
    rng: &mut StdRng,
) -> Result<Outcome> {
    let mut words: Vec<String> = puzzle.concat();
    words.shuffle(rng);
    info!(words = ?words, "shuffled puzzle");

    let mut state = TurnState::default();
    let mut invalid = 0;

    while state.strikes < MAX_STRIKES
        && state.correct_groups.len() < puzzle.len()
        && invalid < MAX_INVALID_GUESSES
    {
        let guess = pick_guess(grouper, &words, &state)?;
        info!(guess = ?guess.words, end_turn = guess.end_turn, "model guess");
        if guess.end_turn {
            break;
        }

        if guess.words.len() != 4 {
            state.error = Some("Please enter 4 words.".to_string());
            invalid += 1;
            continue;
        }
        let sorted_guess = sorted_upper(&guess.words);
        if state.previous_guesses.iter().any(|g| sorted_upper(g) == sorted_guess) {
            state.error = Some("You have already guessed this combination.".to_string());
            invalid += 1;
            continue;
        }
        state.error = None;
        state.previous_guesses.push(guess.words.clone());

        let guessed: HashSet<&String> = sorted_guess.iter().collect();
        let mut correctly_guessed = false;
        state.is_one_away = false;
        for group in puzzle {
            let sorted_group = sorted_upper(group);
            if sorted_group == sorted_guess {
                correctly_guessed = true;
                state.correct_groups.push(group.clone());
                break;
            }
            let expected: HashSet<&String> = sorted_group.iter().collect();
            if expected.symmetric_difference(&guessed).count() == 2 {
                state.is_one_away = true;
                break;
            }
        }

        if !correctly_guessed {
            state.strikes += 1;
            info!(strikes = state.strikes, one_away = state.is_one_away, "incorrect guess");
        }
    }

    Ok(Outcome {
        correct: state.correct_groups.len(),
        strikes: state.strikes,
        points: score(state.correct_groups.len(), state.strikes),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let word_vectors = WordVectors::open(&cli.vectors)
        .with_context(|| format!("loading word vectors from {}", cli.vectors.display()))?;
    let grouper = Grouper::new(&word_vectors, GroupingConfig::from(&cli.grouping))?;

    let puzzles = read_puzzles(&cli.puzzles)
        .with_context(|| format!("reading puzzles from {}", cli.puzzles.display()))?;

    let seed = if cli.seed == 0 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(1)
    } else {
        cli.seed
    };
    eprintln!("Using random seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut total_points = 0.0;
    let mut total_correct = 0;
    let mut played = 0;

    for (n, puzzle) in puzzles.iter().enumerate() {
        if puzzle.len() != GROUP_MULTIPLIERS.len() || puzzle.iter().any(|g| g.len() != 4) {
            warn!(puzzle = n + 1, "skipping puzzle that is not four groups of four");
            continue;
        }
        let outcome = play(&grouper, puzzle, &mut rng)?;
        played += 1;
        total_points += outcome.points;
        total_correct += outcome.correct;

        let time_str = Local::now().format("%x - %I:%M.%S%p");
        println!(
            "{time_str}, puzzle: {p:03}, groups: {c}/4, strikes: {s}, points: {pts:.2}",
            p = n + 1,
            c = outcome.correct,
            s = outcome.strikes,
            pts = outcome.points
        );
    }

    println!("\nOVERALL RESULTS:");
    println!("Puzzles played: {played}");
    println!("Groups found: {total_correct}/{}", 4 * played);
    println!("Total points: {total_points:.2}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_follow_group_and_strike_multipliers() {
        assert_eq!(score(0, 0), 0.0);
        assert_eq!(score(4, 0), 9.0);
        assert!((score(2, 1) - 2.7).abs() < 1e-12);
        assert!((score(1, 9) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn puzzle_file_sections_and_comma_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("puzzles.txt");
        fs::write(
            &path,
            ": first\na b c d\ne f g h\n\n: second\nice cream, hot dog, pie, cake\n",
        )
        .unwrap();
        let puzzles = read_puzzles(&path).unwrap();
        assert_eq!(puzzles.len(), 2);
        assert_eq!(puzzles[0][1], ["e", "f", "g", "h"]);
        assert_eq!(puzzles[1][0], ["ice cream", "hot dog", "pie", "cake"]);
    }
}
