//! Pairwise word similarity along three axes: semantic (embedding based),
//! lexical (character and n-gram overlap) and spelling (edit distance).
//!
//! Embedding metrics return `None` when either word is out of vocabulary.
//! Only [`composite_semantic`] turns that into a number, scoring it as 0.

use crate::embedding::EmbeddingProvider;
use std::collections::HashSet;

/// Relative weights of the three semantic sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemanticWeights {
    pub cosine: f64,
    pub euclidean: f64,
    pub neighbor: f64,
}

impl Default for SemanticWeights {
    fn default() -> Self {
        SemanticWeights {
            cosine: 0.4,
            euclidean: 0.3,
            neighbor: 0.3,
        }
    }
}

impl SemanticWeights {
    /// Scale the weights to sum to 1. All-zero weights stay zero.
    pub fn normalized(&self) -> SemanticWeights {
        let total = self.cosine + self.euclidean + self.neighbor;
        if total <= 0.0 {
            return SemanticWeights {
                cosine: 0.0,
                euclidean: 0.0,
                neighbor: 0.0,
            };
        }
        SemanticWeights {
            cosine: self.cosine / total,
            euclidean: self.euclidean / total,
            neighbor: self.neighbor / total,
        }
    }
}

fn vector_pair<'a, P: EmbeddingProvider + ?Sized>(
    provider: &'a P,
    w1: &str,
    w2: &str,
) -> Option<(&'a [f64], &'a [f64])> {
    Some((provider.vector(w1)?, provider.vector(w2)?))
}

/// Cosine similarity mapped from [-1, 1] onto [0, 1].
pub fn embedding_cosine<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    w1: &str,
    w2: &str,
) -> Option<f64> {
    let (a, b) = vector_pair(provider, w1, w2)?;
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    let cosine = if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        (dot / (na * nb)).clamp(-1.0, 1.0)
    };
    Some((cosine + 1.0) / 2.0)
}

/// `1 / (1 + d)` where `d` is the Euclidean distance between the vectors.
pub fn embedding_euclidean<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    w1: &str,
    w2: &str,
) -> Option<f64> {
    let (a, b) = vector_pair(provider, w1, w2)?;
    let distance = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt();
    Some(1.0 / (1.0 + distance))
}

/// Shared nearest neighbours of the two words, divided by `top_n`
/// rather than by the size of the union.
pub fn neighbor_overlap<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    w1: &str,
    w2: &str,
    top_n: usize,
) -> Option<f64> {
    if top_n == 0 {
        return None;
    }
    let n1 = provider.nearest_neighbors(w1, top_n)?;
    let n2 = provider.nearest_neighbors(w2, top_n)?;

    let set1: HashSet<&str> = n1.iter().map(|(w, _)| *w).collect();
    let shared = n2
        .iter()
        .map(|(w, _)| *w)
        .collect::<HashSet<&str>>()
        .intersection(&set1)
        .count();
    Some(shared as f64 / top_n as f64)
}

/// Weighted blend of the cosine, Euclidean and neighbour-overlap scores.
/// Out-of-vocabulary sub-scores count as 0 so a missing vector lowers the
/// score instead of aborting.
pub fn composite_semantic<P: EmbeddingProvider + ?Sized>(
    provider: &P,
    w1: &str,
    w2: &str,
    top_n: usize,
    weights: &SemanticWeights,
) -> f64 {
    let w = weights.normalized();
    let mut score = 0.0;
    if w.cosine > 0.0 {
        score += w.cosine * embedding_cosine(provider, w1, w2).unwrap_or(0.0);
    }
    if w.euclidean > 0.0 {
        score += w.euclidean * embedding_euclidean(provider, w1, w2).unwrap_or(0.0);
    }
    if w.neighbor > 0.0 {
        score += w.neighbor * neighbor_overlap(provider, w1, w2, top_n).unwrap_or(0.0);
    }
    score
}

fn jaccard<T: Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard similarity of the two words' character sets.
pub fn character_jaccard(w1: &str, w2: &str) -> f64 {
    let a: HashSet<char> = w1.chars().collect();
    let b: HashSet<char> = w2.chars().collect();
    jaccard(&a, &b)
}

fn ngrams(word: &str, n: usize) -> HashSet<&str> {
    let bounds: Vec<usize> = word
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(word.len()))
        .collect();
    if n == 0 || bounds.len() <= n {
        return HashSet::new();
    }
    bounds
        .windows(n + 1)
        .map(|w| &word[w[0]..w[n]])
        .collect()
}

/// Jaccard similarity over the sets of length-`n` substrings.
pub fn ngram_jaccard(w1: &str, w2: &str, n: usize) -> f64 {
    jaccard(&ngrams(w1, n), &ngrams(w2, n))
}

/// Levenshtein distance counted in `char`s.
pub fn edit_distance(w1: &str, w2: &str) -> usize {
    let b: Vec<char> = w2.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in w1.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
