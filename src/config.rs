//! Rating configuration and the published rating constants.

use serde::{Deserialize, Serialize};

/// Minimum qualifying plays (roughly five games) for a quarterback to be rated.
pub const MIN_PLAYS: usize = 150;

/// Feature weights in feature order: EPA/play, CPOE, yards, TDs, -INTs.
pub const WEIGHTS: [f64; 5] = [0.30, 0.20, 0.15, 0.25, 0.10];

/// Lower bound of the rating scale.
pub const RATING_MIN: f64 = 50.0;

/// Upper bound of the rating scale.
pub const RATING_MAX: f64 = 99.0;

/// How the transformer reacts when standardization or scaling is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Zero-variance features contribute 0; equal raw scores all map to the
    /// scale midpoint.
    #[default]
    Neutral,
    /// Return [`RatingError::DegenerateDistribution`](crate::error::RatingError).
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    pub min_plays: usize,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            min_plays: MIN_PLAYS,
            degenerate_policy: DegeneratePolicy::Neutral,
        }
    }
}

impl RatingConfig {
    pub fn with_min_plays(mut self, min_plays: usize) -> Self {
        self.min_plays = min_plays;
        self
    }

    pub fn strict(mut self) -> Self {
        self.degenerate_policy = DegeneratePolicy::Strict;
        self
    }

    /// Midpoint of the rating scale, used when every raw score is equal.
    pub fn neutral_rating() -> f64 {
        (RATING_MIN + RATING_MAX) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_config() {
        let config = RatingConfig::default();
        assert_eq!(config.min_plays, 150);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Neutral);
    }

    #[test]
    fn test_builders() {
        let config = RatingConfig::default().with_min_plays(10).strict();
        assert_eq!(config.min_plays, 10);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Strict);
    }

    #[test]
    fn test_neutral_rating_is_midpoint() {
        assert_eq!(RatingConfig::neutral_rating(), 74.5);
    }
}
