use crate::embedding::EmbeddingProvider;
use crate::error::GroupingError;
use crate::grouping::Grouper;
use std::collections::HashSet;
use tracing::debug;

/// Game history handed in by the caller for one turn.
///
/// Only `correct_groups` and `previous_guesses` affect the choice; the other
/// fields are accepted so callers can pass their full state through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnState {
    pub strikes: u32,
    pub is_one_away: bool,
    pub correct_groups: Vec<Vec<String>>,
    pub previous_guesses: Vec<Vec<String>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    /// Empty when nothing is left to try.
    pub words: Vec<String>,
    pub end_turn: bool,
}

impl Guess {
    fn end() -> Self {
        Guess {
            words: Vec::new(),
            end_turn: true,
        }
    }
}

/// Pick the first freshly computed group that shares no word with any
/// confirmed group or earlier guess.
pub fn pick_guess<P, S>(
    grouper: &Grouper<P>,
    words: &[S],
    state: &TurnState,
) -> Result<Guess, GroupingError>
where
    P: EmbeddingProvider,
    S: AsRef<str>,
{
    let config = grouper.config();
    let used: HashSet<String> = state
        .correct_groups
        .iter()
        .chain(&state.previous_guesses)
        .flatten()
        .map(|w| config.key(w))
        .collect();

    debug!(
        strikes = state.strikes,
        one_away = state.is_one_away,
        error = state.error.as_deref().unwrap_or(""),
        used = used.len(),
        "picking guess"
    );

    let groups = grouper.group(words)?;
    let guess = groups
        .into_iter()
        .find(|g| g.words().iter().all(|w| !used.contains(&config.key(w))))
        .map(|g| Guess {
            words: g.into_words(),
            end_turn: false,
        })
        .unwrap_or_else(Guess::end);
    Ok(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupingConfig;
    use crate::WordVectors;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn grouper() -> Grouper<WordVectors> {
        let vectors = WordVectors::from_entries([("zzz", vec![1.0])]).unwrap();
        Grouper::new(vectors, GroupingConfig::default()).unwrap()
    }

    const WORDS: [&str; 8] = [
        "cat", "bat", "hat", "mat", "xylophone", "jukebox", "quizzical", "rhythm",
    ];

    #[test]
    fn first_untouched_group_wins() {
        let guess = pick_guess(&grouper(), &WORDS, &TurnState::default()).unwrap();
        assert_eq!(guess.words, strings(&["cat", "bat", "hat", "mat"]));
        assert!(!guess.end_turn);
    }

    #[test]
    fn previous_guess_overlap_skips_group() {
        let state = TurnState {
            previous_guesses: vec![strings(&["cat", "rhythm", "jukebox", "hat"])],
            strikes: 1,
            ..Default::default()
        };
        // both groups share a word with the failed guess
        let guess = pick_guess(&grouper(), &WORDS, &state).unwrap();
        assert_eq!(guess, Guess::end());
    }

    #[test]
    fn strikes_and_error_do_not_change_choice() {
        let plain = pick_guess(&grouper(), &WORDS, &TurnState::default()).unwrap();
        let noisy = TurnState {
            strikes: 3,
            is_one_away: true,
            error: Some("You have already guessed this combination.".to_string()),
            ..Default::default()
        };
        assert_eq!(pick_guess(&grouper(), &WORDS, &noisy).unwrap(), plain);
    }

    #[test]
    fn duplicate_words_are_rejected() {
        let err = pick_guess(&grouper(), &["cat", "cat"], &TurnState::default()).unwrap_err();
        assert_eq!(err, GroupingError::DuplicateWord("cat".to_string()));
    }
}
