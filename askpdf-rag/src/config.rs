//! Configuration for the retrieval engine.
//!
//! All of the empirical constants live here: the chunk size bound, the
//! minimum passage length, and the distance threshold / over-fetch
//! factor, which were calibrated against all-MiniLM-L6-v2's squared-L2
//! distance distribution. Swapping the embedding model means re-tuning
//! them, so they are configuration rather than hard-coded law.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Tunable parameters for chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum passage size in characters.
    pub chunk_max_chars: usize,
    /// Minimum page text length; shorter pages produce no passages.
    pub min_passage_chars: usize,
    /// Default number of passages returned per query.
    pub top_k: usize,
    /// Candidates with squared-L2 distance at or above this are
    /// discarded.
    pub distance_threshold: f32,
    /// Over-fetch multiplier: the index is asked for
    /// `top_k * overfetch_factor` candidates to absorb filtering and
    /// dedup losses.
    pub overfetch_factor: usize,
    /// Number of leading passages returned when no candidate survives
    /// filtering.
    pub fallback_passages: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_max_chars: 500,
            min_passage_chars: 10,
            top_k: 5,
            distance_threshold: 1.5,
            overfetch_factor: 2,
            fallback_passages: 3,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum passage size in characters.
    pub fn chunk_max_chars(mut self, chars: usize) -> Self {
        self.config.chunk_max_chars = chars;
        self
    }

    /// Set the minimum page text length.
    pub fn min_passage_chars(mut self, chars: usize) -> Self {
        self.config.min_passage_chars = chars;
        self
    }

    /// Set the default number of passages returned per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the squared-L2 distance cutoff for candidates.
    pub fn distance_threshold(mut self, threshold: f32) -> Self {
        self.config.distance_threshold = threshold;
        self
    }

    /// Set the over-fetch multiplier.
    pub fn overfetch_factor(mut self, factor: usize) -> Self {
        self.config.overfetch_factor = factor;
        self
    }

    /// Set the number of leading passages used as fallback context.
    pub fn fallback_passages(mut self, count: usize) -> Self {
        self.config.fallback_passages = count;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are
    /// consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `top_k` or `overfetch_factor` is zero
    /// - `distance_threshold` is not a positive finite number
    /// - `min_passage_chars >= chunk_max_chars`
    pub fn build(self) -> Result<RagConfig> {
        let c = &self.config;
        if c.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if c.overfetch_factor == 0 {
            return Err(RagError::Config("overfetch_factor must be greater than zero".to_string()));
        }
        if !(c.distance_threshold.is_finite() && c.distance_threshold > 0.0) {
            return Err(RagError::Config(format!(
                "distance_threshold ({}) must be a positive finite number",
                c.distance_threshold
            )));
        }
        if c.min_passage_chars >= c.chunk_max_chars {
            return Err(RagError::Config(format!(
                "min_passage_chars ({}) must be less than chunk_max_chars ({})",
                c.min_passage_chars, c.chunk_max_chars
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_calibrated_constants() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_max_chars, 500);
        assert_eq!(config.min_passage_chars, 10);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.distance_threshold, 1.5);
        assert_eq!(config.overfetch_factor, 2);
        assert_eq!(config.fallback_passages, 3);
    }

    #[test]
    fn builder_rejects_inconsistent_parameters() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
        assert!(RagConfig::builder().overfetch_factor(0).build().is_err());
        assert!(RagConfig::builder().distance_threshold(-1.0).build().is_err());
        assert!(RagConfig::builder().min_passage_chars(600).build().is_err());
    }
}
