//! Group a puzzle's words into fours and pick the next guess.
//!
//! Words are clustered in stages: embedding similarity first, then shared
//! character n-grams, then small edit distances, and finally whatever is left
//! is chunked in order. [`pick_guess`] turns the result into a single guess
//! for a word-grouping game.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod grouping;
pub mod similarity;
pub mod turn;
pub mod vectors_bin;
mod word_vectors;

pub use config::GroupingConfig;
pub use embedding::EmbeddingProvider;
pub use error::{GroupingError, VectorsError};
pub use grouping::{Group, Grouper, Pass};
pub use similarity::SemanticWeights;
pub use turn::{Guess, TurnState, pick_guess};
pub use word_vectors::WordVectors;
