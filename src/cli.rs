//! Pieces shared by the command-line tools.

use crate::config::GroupingConfig;
use crate::similarity::SemanticWeights;
use clap::Args;
use tracing_subscriber::EnvFilter;

/// Grouping thresholds and weights as command-line flags.
#[derive(Args, Debug, Clone)]
pub struct GroupingArgs {
    /// Minimum composite semantic similarity for the semantic pass
    #[arg(long, default_value_t = 0.7)]
    pub semantic_threshold: f64,

    /// Minimum bigram Jaccard similarity for the lexical pass
    #[arg(long, default_value_t = 0.8)]
    pub lexical_threshold: f64,

    /// Largest edit distance accepted by the spelling pass
    #[arg(long, default_value_t = 3)]
    pub max_edit_distance: usize,

    #[arg(long, default_value_t = 0.4)]
    pub cosine_weight: f64,

    #[arg(long, default_value_t = 0.3)]
    pub euclidean_weight: f64,

    #[arg(long, default_value_t = 0.3)]
    pub neighbor_weight: f64,

    /// Neighbour list length for the overlap score
    #[arg(long, default_value_t = 50)]
    pub top_n: usize,

    #[arg(long, default_value_t = 2)]
    pub ngram_size: usize,

    /// Compare words case-insensitively
    #[arg(long)]
    pub fold_case: bool,
}

impl From<&GroupingArgs> for GroupingConfig {
    fn from(args: &GroupingArgs) -> Self {
        GroupingConfig {
            semantic_threshold: args.semantic_threshold,
            lexical_threshold: args.lexical_threshold,
            max_edit_distance: args.max_edit_distance,
            weights: SemanticWeights {
                cosine: args.cosine_weight,
                euclidean: args.euclidean_weight,
                neighbor: args.neighbor_weight,
            },
            top_n: args.top_n,
            ngram_size: args.ngram_size,
            fold_case: args.fold_case,
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the verbosity count.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
