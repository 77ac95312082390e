use tracing::info;

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::rating::rate;
use crate::analyzers::types::{QbRating, RatingTable};
use crate::config::RatingConfig;
use crate::error::RatingError;
use crate::plays::PlayRecord;

/// Aggregates plays and rates every quarterback that meets the play minimum.
///
/// # Errors
///
/// [`RatingError::InsufficientData`] when no quarterback qualifies, plus any
/// degenerate-distribution error raised under a strict policy.
pub fn rate_plays(plays: &[PlayRecord], config: &RatingConfig) -> Result<Vec<QbRating>, RatingError> {
    let summaries = aggregate(plays, config.min_plays);
    rate(&summaries, config)
}

/// Runs the whole pipeline for one dataset and wraps the result in a [`RatingTable`].
#[tracing::instrument(skip(plays, config), fields(plays = plays.len()))]
pub fn build_table(
    plays: &[PlayRecord],
    season: Option<u16>,
    config: &RatingConfig,
) -> Result<RatingTable, RatingError> {
    let ratings = rate_plays(plays, config)?;
    info!(rated = ratings.len(), "Rating table built");
    Ok(RatingTable::new(season, ratings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plays_for(passer: &str, n: usize, epa: f64, td_every: usize) -> Vec<PlayRecord> {
        (0..n)
            .map(|i| PlayRecord {
                play_id: Some(format!("{passer}-{i}")),
                team: Some("KC".to_string()),
                passer_name: Some(passer.to_string()),
                expected_points_added: Some(epa),
                completion_pct_over_expected: Some(epa * 10.0),
                yards_gained: 6,
                is_pass_touchdown: i % td_every == 0,
                is_interception: false,
            })
            .collect()
    }

    #[test]
    fn test_no_qualifying_quarterbacks() {
        let plays = plays_for("Backup", 120, 0.9, 5);
        let err = rate_plays(&plays, &RatingConfig::default()).unwrap_err();
        assert_eq!(err, RatingError::InsufficientData);
    }

    #[test]
    fn test_below_threshold_never_rated() {
        let plays = [
            plays_for("Good", 200, 0.2, 20),
            plays_for("Weak", 180, -0.1, 40),
            plays_for("Cameo", 120, 1.5, 2),
        ]
        .concat();

        let table = build_table(&plays, Some(2024), &RatingConfig::default()).unwrap();
        assert_eq!(table.season, Some(2024));
        assert_eq!(table.len(), 2);
        assert!(table.ratings.iter().all(|r| r.name() != "Cameo"));
        assert_eq!(table.ratings[0].name(), "Good");
    }
}
