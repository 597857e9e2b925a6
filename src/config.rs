use crate::error::GroupingError;
use crate::similarity::SemanticWeights;

/// Thresholds and weights for the grouping passes.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingConfig {
    /// Minimum composite semantic score for the semantic pass.
    pub semantic_threshold: f64,
    /// Minimum n-gram Jaccard score for the lexical pass.
    pub lexical_threshold: f64,
    /// Largest edit distance accepted by the spelling pass.
    pub max_edit_distance: usize,
    pub weights: SemanticWeights,
    /// Neighbour list length for the overlap sub-score.
    pub top_n: usize,
    /// Gram length used by the lexical pass.
    pub ngram_size: usize,
    /// Compare words case-insensitively. Groups still hold the words as given.
    pub fold_case: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        GroupingConfig {
            semantic_threshold: 0.7,
            lexical_threshold: 0.8,
            max_edit_distance: 3,
            weights: SemanticWeights::default(),
            top_n: 50,
            ngram_size: 2,
            fold_case: false,
        }
    }
}

impl GroupingConfig {
    pub fn validate(&self) -> Result<(), GroupingError> {
        let invalid = |msg: String| Err(GroupingError::InvalidConfig(msg));

        for (name, value) in [
            ("semantic threshold", self.semantic_threshold),
            ("lexical threshold", self.lexical_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a nonnegative number, got {value}"));
            }
        }

        let w = &self.weights;
        for (name, value) in [
            ("cosine", w.cosine),
            ("euclidean", w.euclidean),
            ("neighbor", w.neighbor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!(
                    "{name} weight must be a nonnegative number, got {value}"
                ));
            }
        }

        if self.ngram_size == 0 {
            return invalid("n-gram size must be at least 1".to_string());
        }
        Ok(())
    }

    /// The key a word is compared and de-duplicated under.
    pub(crate) fn key(&self, word: &str) -> String {
        if self.fold_case {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GroupingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = GroupingConfig::default();
        config.weights.euclidean = -0.1;
        assert!(matches!(
            config.validate(),
            Err(GroupingError::InvalidConfig(msg)) if msg.contains("euclidean")
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = GroupingConfig {
            lexical_threshold: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GroupingError::InvalidConfig(msg)) if msg.contains("lexical threshold")
        ));

        let config = GroupingConfig {
            semantic_threshold: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn nan_threshold_and_zero_ngram_are_rejected() {
        let config = GroupingConfig {
            semantic_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GroupingConfig {
            ngram_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn key_respects_case_policy() {
        let mut config = GroupingConfig::default();
        assert_eq!(config.key("Apple"), "Apple");
        config.fold_case = true;
        assert_eq!(config.key("Apple"), "apple");
    }
}
