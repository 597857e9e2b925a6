//! Staged greedy partitioning of a word list into groups of four.
//!
//! Passes run in a fixed order, each over whatever the previous one left:
//! semantic (composite embedding score), lexical (n-gram Jaccard), spelling
//! (edit distance), then a catch-all that chunks the rest in order.

use crate::config::GroupingConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::GroupingError;
use crate::similarity::{composite_semantic, edit_distance, ngram_jaccard};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, trace, warn};

pub const GROUP_SIZE: usize = 4;

/// Which pass formed a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Semantic,
    Lexical,
    Spelling,
    CatchAll,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pass::Semantic => "semantic",
            Pass::Lexical => "lexical",
            Pass::Spelling => "spelling",
            Pass::CatchAll => "catch-all",
        };
        f.write_str(name)
    }
}

/// A committed group. Only the last catch-all group may hold fewer than four words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    label: String,
    pass: Pass,
    words: Vec<String>,
}

impl Group {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn into_words(self) -> Vec<String> {
        self.words
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.label, self.pass, self.words.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// How a candidate's scores against the current members are judged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criterion {
    pub direction: Direction,
    pub threshold: f64,
}

impl Criterion {
    pub fn at_least(threshold: f64) -> Self {
        Criterion {
            direction: Direction::HigherIsBetter,
            threshold,
        }
    }

    pub fn at_most(threshold: f64) -> Self {
        Criterion {
            direction: Direction::LowerIsBetter,
            threshold,
        }
    }

    fn best(&self, scores: impl Iterator<Item = f64>) -> f64 {
        match self.direction {
            Direction::HigherIsBetter => scores.fold(f64::NEG_INFINITY, f64::max),
            Direction::LowerIsBetter => scores.fold(f64::INFINITY, f64::min),
        }
    }

    fn accepts(&self, score: f64) -> bool {
        match self.direction {
            Direction::HigherIsBetter => score >= self.threshold,
            Direction::LowerIsBetter => score <= self.threshold,
        }
    }
}

/// One greedy sweep over `pool`.
///
/// Each uncommitted item in turn seeds a candidate group; the other
/// uncommitted items are scanned in pool order and join when their best score
/// against the current members passes `criterion`. A group is kept only once
/// it reaches [`GROUP_SIZE`]; a shorter attempt is dropped and all its items
/// stay available. Returns the committed groups and the leftover pool, both in
/// pool order.
pub fn greedy_pass<T, F>(
    pool: &[T],
    mut score: F,
    criterion: Criterion,
) -> (Vec<Vec<T>>, Vec<T>)
where
    T: Copy,
    F: FnMut(T, T) -> f64,
{
    let mut committed = vec![false; pool.len()];
    let mut groups = Vec::new();

    for seed in 0..pool.len() {
        if committed[seed] {
            continue;
        }
        let mut members = vec![seed];

        for candidate in 0..pool.len() {
            if members.len() == GROUP_SIZE {
                break;
            }
            if committed[candidate] || members.contains(&candidate) {
                continue;
            }
            let best = criterion.best(members.iter().map(|&m| score(pool[m], pool[candidate])));
            if criterion.accepts(best) {
                members.push(candidate);
            }
        }

        if members.len() == GROUP_SIZE {
            for &m in &members {
                committed[m] = true;
            }
            groups.push(members.iter().map(|&m| pool[m]).collect());
        } else {
            trace!(seed, size = members.len(), "released incomplete group");
        }
    }

    let remaining = pool
        .iter()
        .zip(&committed)
        .filter(|(_, done)| !**done)
        .map(|(&item, _)| item)
        .collect();
    (groups, remaining)
}

// Precomputed neighbour lists for the words being grouped, so the overlap
// score does not rescan the vocabulary for every pair.
struct NeighborCache<'p, P: ?Sized> {
    inner: &'p P,
    top_n: usize,
    lists: HashMap<&'p str, Option<Vec<(&'p str, f64)>>>,
}

impl<'p, P: EmbeddingProvider + ?Sized> NeighborCache<'p, P> {
    fn new(inner: &'p P, words: &'p [String], top_n: usize) -> Self {
        let lists = words
            .iter()
            .map(|w| (w.as_str(), inner.nearest_neighbors(w, top_n)))
            .collect();
        NeighborCache {
            inner,
            top_n,
            lists,
        }
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for NeighborCache<'_, P> {
    fn vector(&self, word: &str) -> Option<&[f64]> {
        self.inner.vector(word)
    }

    fn nearest_neighbors(&self, word: &str, k: usize) -> Option<Vec<(&str, f64)>> {
        match self.lists.get(word) {
            Some(list) if k <= self.top_n => {
                list.as_ref().map(|l| l.iter().take(k).copied().collect())
            }
            _ => self.inner.nearest_neighbors(word, k),
        }
    }

    fn has_vector(&self, word: &str) -> bool {
        self.inner.has_vector(word)
    }
}

/// Runs the grouping passes against an embedding provider.
pub struct Grouper<P> {
    provider: P,
    config: GroupingConfig,
}

impl<P: EmbeddingProvider> Grouper<P> {
    pub fn new(provider: P, config: GroupingConfig) -> Result<Self, GroupingError> {
        config.validate()?;
        Ok(Grouper { provider, config })
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Partition `words` into groups, in formation order.
    ///
    /// Every word lands in exactly one group. Fails before any pass runs if a
    /// word repeats (compared after case folding when that is enabled).
    pub fn group<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<Group>, GroupingError> {
        let keys = self.keys(words)?;
        let config = &self.config;
        let mut groups = Vec::new();
        let pool: Vec<usize> = (0..words.len()).collect();

        for key in keys.iter().filter(|k| !self.provider.has_vector(k)) {
            warn!(word = %key, "no embedding; semantic score counts as 0");
        }

        // Neighbour lists are only read when the overlap sub-score carries weight.
        let cached: &[String] = if config.top_n > 0 && config.weights.normalized().neighbor > 0.0 {
            &keys
        } else {
            &[]
        };
        let cache = NeighborCache::new(&self.provider, cached, config.top_n);
        let (found, pool) = greedy_pass(
            &pool,
            |a, b| composite_semantic(&cache, &keys[a], &keys[b], config.top_n, &config.weights),
            Criterion::at_least(config.semantic_threshold),
        );
        commit(&mut groups, Pass::Semantic, found, words, pool.len());

        let (found, pool) = greedy_pass(
            &pool,
            |a, b| ngram_jaccard(&keys[a], &keys[b], config.ngram_size),
            Criterion::at_least(config.lexical_threshold),
        );
        commit(&mut groups, Pass::Lexical, found, words, pool.len());

        let (found, pool) = greedy_pass(
            &pool,
            |a, b| edit_distance(&keys[a], &keys[b]) as f64,
            Criterion::at_most(config.max_edit_distance as f64),
        );
        commit(&mut groups, Pass::Spelling, found, words, pool.len());

        let leftovers = pool.chunks(GROUP_SIZE).map(<[usize]>::to_vec).collect();
        commit(&mut groups, Pass::CatchAll, leftovers, words, 0);

        Ok(groups)
    }

    fn keys<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<String>, GroupingError> {
        let keys: Vec<String> = words.iter().map(|w| self.config.key(w.as_ref())).collect();
        let mut seen = HashSet::with_capacity(keys.len());
        for (word, key) in words.iter().zip(&keys) {
            if !seen.insert(key.as_str()) {
                return Err(GroupingError::DuplicateWord(word.as_ref().to_string()));
            }
        }
        Ok(keys)
    }
}

fn commit<S: AsRef<str>>(
    groups: &mut Vec<Group>,
    pass: Pass,
    found: Vec<Vec<usize>>,
    words: &[S],
    remaining: usize,
) {
    let formed = found.len();
    for members in found {
        let group = Group {
            label: format!("Group{}", groups.len() + 1),
            pass,
            words: members.iter().map(|&i| words[i].as_ref().to_string()).collect(),
        };
        debug!(%group, "committed");
        groups.push(group);
    }
    debug!(%pass, formed, remaining, "pass finished");
}
