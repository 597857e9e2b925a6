/// Read-only access to a pre-built word-vector space.
///
/// Implementations must not mutate after construction, so one instance can be
/// shared by any number of concurrent grouping calls.
pub trait EmbeddingProvider {
    /// The vector for `word`, or `None` if the word is out of vocabulary.
    fn vector(&self, word: &str) -> Option<&[f64]>;

    /// Up to `k` nearest words to `word` by the provider's own ranking,
    /// best first, excluding `word` itself. `None` if `word` is out of vocabulary.
    fn nearest_neighbors(&self, word: &str, k: usize) -> Option<Vec<(&str, f64)>>;

    fn has_vector(&self, word: &str) -> bool {
        self.vector(word).is_some()
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for &P {
    fn vector(&self, word: &str) -> Option<&[f64]> {
        (**self).vector(word)
    }

    fn nearest_neighbors(&self, word: &str, k: usize) -> Option<Vec<(&str, f64)>> {
        (**self).nearest_neighbors(word, k)
    }

    fn has_vector(&self, word: &str) -> bool {
        (**self).has_vector(word)
    }
}
