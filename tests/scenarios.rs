use connections_rs::similarity::{
    character_jaccard, composite_semantic, edit_distance, ngram_jaccard,
};
use connections_rs::{
    Grouper, GroupingConfig, Pass, SemanticWeights, TurnState, WordVectors, pick_guess,
};
use std::collections::BTreeSet;

const THEMES: [[&str; 4]; 4] = [
    ["apple", "banana", "cherry", "date"],
    ["dog", "cat", "mouse", "rabbit"],
    ["red", "blue", "green", "yellow"],
    ["car", "bus", "train", "plane"],
];

// Interleaved so no theme arrives as a contiguous run.
const PUZZLE: [&str; 16] = [
    "dog", "apple", "red", "car", "banana", "cat", "blue", "bus", "mouse", "cherry", "train",
    "green", "yellow", "plane", "date", "rabbit",
];

// Each word sits on its theme's axis plus a small private component, so
// words of one theme are close and different themes are orthogonal.
fn themed_space() -> WordVectors {
    let dims = THEMES.len() + 16;
    let entries = THEMES.iter().enumerate().flat_map(|(t, theme)| {
        theme.iter().enumerate().map(move |(i, word)| {
            let mut v = vec![0.0; dims];
            v[t] = 3.0;
            v[THEMES.len() + t * 4 + i] = 0.2;
            (*word, v)
        })
    });
    WordVectors::from_entries(entries).unwrap()
}

fn config() -> GroupingConfig {
    GroupingConfig {
        top_n: 3,
        ..Default::default()
    }
}

fn as_sets<S: AsRef<str>>(groups: impl IntoIterator<Item = Vec<S>>) -> BTreeSet<BTreeSet<String>> {
    groups
        .into_iter()
        .map(|g| g.iter().map(|w| w.as_ref().to_string()).collect())
        .collect()
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn themed_words_form_their_themes() {
    let wv = themed_space();
    let grouper = Grouper::new(&wv, config()).unwrap();
    let groups = grouper.group(&PUZZLE).unwrap();

    assert_eq!(groups.len(), 4);
    assert!(groups.iter().all(|g| g.pass() == Pass::Semantic));
    assert_eq!(
        as_sets(groups.into_iter().map(|g| g.into_words())),
        as_sets(THEMES.iter().map(|t| t.to_vec()))
    );
}

#[test]
fn theme_scores_straddle_the_threshold() {
    let wv = themed_space();
    let w = SemanticWeights::default();
    let within = composite_semantic(&wv, "dog", "cat", 3, &w);
    let across = composite_semantic(&wv, "dog", "red", 3, &w);
    assert!(within > 0.7, "within-theme score {within}");
    assert!(across < 0.7, "cross-theme score {across}");
}

#[test]
fn grouping_twice_gives_identical_results() {
    let wv = themed_space();
    let grouper = Grouper::new(&wv, config()).unwrap();
    assert_eq!(grouper.group(&PUZZLE).unwrap(), grouper.group(&PUZZLE).unwrap());
}

#[test]
fn guess_skips_confirmed_theme() {
    let wv = themed_space();
    let grouper = Grouper::new(&wv, config()).unwrap();
    let state = TurnState {
        correct_groups: vec![strings(&THEMES[0])],
        ..Default::default()
    };

    let guess = pick_guess(&grouper, &PUZZLE, &state).unwrap();
    assert!(!guess.end_turn);
    let picked: BTreeSet<String> = guess.words.iter().cloned().collect();
    let remaining = as_sets(THEMES[1..].iter().map(|t| t.to_vec()));
    assert!(remaining.contains(&picked), "unexpected guess {:?}", guess.words);
}

#[test]
fn guess_follows_formation_order() {
    let wv = themed_space();
    let grouper = Grouper::new(&wv, config()).unwrap();
    let groups = grouper.group(&PUZZLE).unwrap();

    let guess = pick_guess(&grouper, &PUZZLE, &TurnState::default()).unwrap();
    assert_eq!(guess.words, groups[0].words());

    // a failed guess touching the first group moves on to the second
    let state = TurnState {
        previous_guesses: vec![vec![groups[0].words()[0].clone(), "nonsense".to_string()]],
        strikes: 1,
        ..Default::default()
    };
    let guess = pick_guess(&grouper, &PUZZLE, &state).unwrap();
    assert_eq!(guess.words, groups[1].words());
}

#[test]
fn all_themes_confirmed_ends_turn() {
    let wv = themed_space();
    let grouper = Grouper::new(&wv, config()).unwrap();
    let state = TurnState {
        correct_groups: THEMES.iter().map(|t| strings(t)).collect(),
        strikes: 2,
        ..Default::default()
    };

    let guess = pick_guess(&grouper, &PUZZLE, &state).unwrap();
    assert!(guess.words.is_empty());
    assert!(guess.end_turn);
}

#[test]
fn literal_metric_values() {
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(character_jaccard("apple", "apple"), 1.0);
    assert_eq!(ngram_jaccard("abc", "xyz", 2), 0.0);
}

#[test]
fn out_of_vocabulary_words_still_get_grouped() {
    let wv = themed_space();
    let grouper = Grouper::new(&wv, config()).unwrap();
    let mut words = strings(&PUZZLE[..12]);
    words.extend(strings(&["qwerty", "zxcvbn", "asdfgh", "poiuyt"]));

    let groups = grouper.group(&words).unwrap();
    let covered: usize = groups.iter().map(|g| g.words().len()).sum();
    assert_eq!(covered, 16);
    assert!(
        groups
            .iter()
            .any(|g| g.words().iter().any(|w| w == "qwerty"))
    );
}
