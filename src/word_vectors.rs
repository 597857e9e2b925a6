use crate::embedding::EmbeddingProvider;
use crate::error::VectorsError;
use crate::vectors_bin;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

// A struct to hold word vectors in a contiguous array for performance.
pub struct WordVectors {
    words: Vec<String>,               // vocabulary - index to word map
    word_map: HashMap<String, usize>, // word to index map
    vectors: Vec<f64>,                // A single, flattened Vec of all vector data
    norms: Vec<f64>,                  // L2 norm of each row, for cosine ranking
    dims: usize,                      // The dimension of each vector
}

// Accumulates rows while reading, enforcing a single dimension.
#[derive(Default)]
struct Builder {
    words: Vec<String>,
    word_map: HashMap<String, usize>,
    vectors: Vec<f64>,
    dims: usize,
}

impl Builder {
    fn push(&mut self, word: String, values: &[f64]) -> Result<(), VectorsError> {
        if self.words.is_empty() {
            // Determine dimensions from the first vector
            if values.is_empty() {
                return Err(VectorsError::ZeroDimensions);
            }
            self.dims = values.len();
        } else if values.len() != self.dims {
            return Err(VectorsError::DimensionMismatch {
                word,
                found: values.len(),
                expected: self.dims,
            });
        }

        // A repeated word keeps its first row.
        if self.word_map.contains_key(&word) {
            debug!(word = %word, "skipping repeated word");
            return Ok(());
        }
        self.word_map.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.extend_from_slice(values);
        Ok(())
    }

    fn finish(self) -> Result<WordVectors, VectorsError> {
        if self.words.is_empty() {
            return Err(VectorsError::Empty);
        }
        let norms = self
            .vectors
            .chunks_exact(self.dims)
            .map(|v| v.iter().map(|x| x * x).sum::<f64>().sqrt())
            .collect();
        Ok(WordVectors {
            words: self.words,
            word_map: self.word_map,
            vectors: self.vectors,
            norms,
            dims: self.dims,
        })
    }
}

impl WordVectors {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn get_word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    pub fn get_index(&self, word: &str) -> Option<&usize> {
        self.word_map.get(word)
    }

    fn get_vector(&self, idx: usize) -> &[f64] {
        &self.vectors[idx * self.dims..(idx + 1) * self.dims]
    }

    /// Build a store from in-memory `(word, vector)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Result<WordVectors, VectorsError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut builder = Builder::default();
        for (word, values) in entries {
            builder.push(word.into(), &values)?;
        }
        builder.finish()
    }

    /// Read word vectors from a text file: `word v1 v2 ...` per line.
    /// A leading word2vec-style `<count> <dims>` line is skipped.
    /// Vectors are kept as read; no normalisation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<WordVectors, VectorsError> {
        let file = fs::File::open(path.as_ref())?;
        let vectors = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.as_ref().display(),
            words = vectors.len(),
            dims = vectors.dims,
            "loaded text word vectors"
        );
        Ok(vectors)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<WordVectors, VectorsError> {
        let mut builder = Builder::default();

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let mut parts = line.split_whitespace();

            let Some(key) = parts.next() else {
                continue;
            };
            let rest: Vec<&str> = parts.collect();

            if index == 0
                && rest.len() == 1
                && key.parse::<usize>().is_ok()
                && rest[0].parse::<usize>().is_ok()
            {
                continue;
            }

            let values = rest
                .iter()
                .map(|s| s.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|source| VectorsError::Parse {
                    line: index + 1,
                    source,
                })?;

            builder.push(key.to_string(), &values)?;
        }

        builder.finish()
    }

    pub fn from_binary<P: AsRef<Path>>(path: P) -> Result<WordVectors, VectorsError> {
        let file = fs::File::open(path.as_ref())?;
        let byte_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        let (words, dims, vectors) = vectors_bin::read_vectors(&mut reader, byte_len)?;
        let mut builder = Builder::default();
        for (word, row) in words.into_iter().zip(vectors.chunks_exact(dims)) {
            builder.push(word, row)?;
        }
        let vectors = builder.finish()?;
        info!(
            path = %path.as_ref().display(),
            words = vectors.len(),
            dims = vectors.dims,
            "loaded binary word vectors"
        );
        Ok(vectors)
    }

    /// Load either format, sniffing the binary magic.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<WordVectors, VectorsError> {
        let mut reader = BufReader::new(fs::File::open(path.as_ref())?);
        if reader.fill_buf()?.starts_with(&vectors_bin::MAGIC) {
            Self::from_binary(path)
        } else {
            Self::from_file(path)
        }
    }

    pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<(), VectorsError> {
        let mut writer = BufWriter::new(fs::File::create(path.as_ref())?);
        vectors_bin::write_vectors(&mut writer, &self.words, self.dims, &self.vectors)?;
        writer.flush()?;
        Ok(())
    }

    /// Top `n` words by cosine similarity to the word at `idx`, best first,
    /// excluding `idx`. Ties go to the lower vocabulary index.
    pub fn nearest(&self, idx: usize, n: usize) -> Vec<(usize, f64)> {
        if n == 0 {
            return Vec::new();
        }
        let target = self.get_vector(idx);
        let target_norm = self.norms[idx];

        // Collect all scores in parallel
        let mut scores: Vec<(usize, f64)> = self
            .vectors
            .par_chunks_exact(self.dims)
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(i, v_slice)| {
                let denom = self.norms[i] * target_norm;
                let dot = v_slice.iter().zip(target).map(|(v, t)| v * t).sum::<f64>();
                let score = if denom > 0.0 { dot / denom } else { 0.0 };
                (i, score)
            })
            .collect();

        let by_score = |a: &(usize, f64), b: &(usize, f64)| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        };

        // Instead of a full sort, do a partial sort.
        if n < scores.len() {
            scores.select_nth_unstable_by(n, by_score);
            scores.truncate(n);
        }
        scores.sort_by(by_score);
        scores
    }
}

impl EmbeddingProvider for WordVectors {
    fn vector(&self, word: &str) -> Option<&[f64]> {
        self.get_index(word).map(|&idx| self.get_vector(idx))
    }

    fn nearest_neighbors(&self, word: &str, k: usize) -> Option<Vec<(&str, f64)>> {
        let &idx = self.get_index(word)?;
        Some(
            self.nearest(idx, k)
                .into_iter()
                .map(|(i, score)| (self.get_word(i), score))
                .collect(),
        )
    }

    fn has_vector(&self, word: &str) -> bool {
        self.word_map.contains_key(word)
    }
}
