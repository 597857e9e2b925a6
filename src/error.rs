use std::io;
use std::num::ParseFloatError;
use thiserror::Error;

/// Failures while building a [`crate::WordVectors`] store.
#[derive(Debug, Error)]
pub enum VectorsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: bad vector component: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseFloatError,
    },

    #[error("first vector has zero dimensions, cannot proceed")]
    ZeroDimensions,

    #[error("vector for '{word}' has dimension {found}, expected {expected}")]
    DimensionMismatch {
        word: String,
        found: usize,
        expected: usize,
    },

    #[error("no word vectors found")]
    Empty,

    #[error("not a binary vector file (bad magic or version)")]
    BadHeader,

    #[error("word {index} in binary vector file is not valid UTF-8")]
    BadWord { index: usize },
}

/// Precondition violations at the grouping boundary.
#[derive(Debug, Error, PartialEq)]
pub enum GroupingError {
    /// The same word (after optional case folding) appears twice in the input.
    #[error("duplicate word in input: '{0}'")]
    DuplicateWord(String),

    #[error("invalid grouping configuration: {0}")]
    InvalidConfig(String),
}
