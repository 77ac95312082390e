//! Data types used by the rating pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Season totals for one quarterback, built from qualifying plays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QbSummary {
    pub name: String,
    pub team: String,
    pub play_count: usize,
    pub total_epa: f64,
    pub epa_per_play: f64,
    /// NaN when none of the quarterback's plays carried a CPOE value.
    pub avg_cpoe: f64,
    pub total_yards: i64,
    pub pass_touchdowns: u32,
    pub interceptions: u32,
}

impl QbSummary {
    /// Feature vector in weight order. Interceptions are negated so that a
    /// higher value is better for every feature.
    pub fn features(&self) -> [f64; 5] {
        [
            self.epa_per_play,
            self.avg_cpoe,
            self.total_yards as f64,
            self.pass_touchdowns as f64,
            -(self.interceptions as f64),
        ]
    }
}

/// A rated quarterback: the summary plus its composite score, scaled rating and rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QbRating {
    #[serde(flatten)]
    pub summary: QbSummary,
    pub raw_score: f64,
    pub qb_rating: f64,
    pub rank: usize,
}

impl QbRating {
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn team(&self) -> &str {
        &self.summary.team
    }
}

/// Ranked ratings for one dataset, in canonical order (best first).
#[derive(Debug, Clone, Serialize)]
pub struct RatingTable {
    pub generated_at: DateTime<Utc>,
    pub season: Option<u16>,
    pub ratings: Vec<QbRating>,
}

impl RatingTable {
    pub fn new(season: Option<u16>, ratings: Vec<QbRating>) -> Self {
        Self {
            generated_at: Utc::now(),
            season,
            ratings,
        }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_negate_interceptions() {
        let summary = QbSummary {
            name: "A.Passer".to_string(),
            team: "KC".to_string(),
            play_count: 200,
            total_epa: 40.0,
            epa_per_play: 0.2,
            avg_cpoe: 1.5,
            total_yards: 3000,
            pass_touchdowns: 20,
            interceptions: 7,
        };
        assert_eq!(summary.features(), [0.2, 1.5, 3000.0, 20.0, -7.0]);
    }
}
