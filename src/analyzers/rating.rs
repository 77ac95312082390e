//! Turns quarterback summaries into standardized, weighted, range-scaled ratings.
//!
//! Each feature column is z-scored across the rated population (population
//! standard deviation), combined with [`WEIGHTS`] into a raw score, and the raw
//! scores are min-max scaled onto [`RATING_MIN`]..=[`RATING_MAX`].

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::analyzers::types::{QbRating, QbSummary};
use crate::analyzers::utility::{mean, stddev};
use crate::config::{DegeneratePolicy, RATING_MAX, RATING_MIN, RatingConfig, WEIGHTS};
use crate::error::RatingError;

/// Feature names in weight order, used in diagnostics.
pub const FEATURE_NAMES: [&str; 5] = [
    "epa_per_play",
    "avg_cpoe",
    "total_yards",
    "pass_touchdowns",
    "neg_interceptions",
];

/// Relative tolerance below which a spread is treated as zero.
const SPREAD_EPSILON: f64 = 1e-9;

fn is_flat(spread: f64, scale: f64) -> bool {
    spread <= SPREAD_EPSILON * scale.abs().max(1.0)
}

/// Z-scores one column. Non-finite entries standardize to 0 (the population
/// mean). Returns `None` when the column has no spread.
fn standardize(column: &[f64]) -> Option<Vec<f64>> {
    let m = mean(column)?;
    let sd = stddev(column, m);
    if is_flat(sd, m) {
        return None;
    }
    Some(
        column
            .iter()
            .map(|v| if v.is_finite() { (v - m) / sd } else { 0.0 })
            .collect(),
    )
}

/// Weighted composite of the standardized features for every quarterback.
fn raw_scores(summaries: &[QbSummary], policy: DegeneratePolicy) -> Result<Vec<f64>, RatingError> {
    let features: Vec<[f64; 5]> = summaries.iter().map(QbSummary::features).collect();
    let mut scores = vec![0.0; summaries.len()];

    for (j, (&weight, &feature)) in WEIGHTS.iter().zip(FEATURE_NAMES.iter()).enumerate() {
        let column: Vec<f64> = features.iter().map(|f| f[j]).collect();
        match standardize(&column) {
            Some(z) => {
                for (score, z) in scores.iter_mut().zip(z) {
                    *score += weight * z;
                }
            }
            None => match policy {
                DegeneratePolicy::Strict => {
                    return Err(RatingError::DegenerateDistribution(format!(
                        "feature `{feature}` has zero variance"
                    )));
                }
                DegeneratePolicy::Neutral => {
                    warn!(feature, "Zero-variance feature contributes nothing to ratings");
                }
            },
        }
    }

    Ok(scores)
}

/// Min-max scales raw scores onto the rating range.
fn scale(raw: &[f64], policy: DegeneratePolicy) -> Result<Vec<f64>, RatingError> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if is_flat(range, max) {
        return match policy {
            DegeneratePolicy::Strict => Err(RatingError::DegenerateDistribution(
                "all raw scores are equal".to_string(),
            )),
            DegeneratePolicy::Neutral => {
                warn!(
                    quarterbacks = raw.len(),
                    "All raw scores equal, assigning the neutral rating"
                );
                Ok(vec![RatingConfig::neutral_rating(); raw.len()])
            }
        };
    }

    Ok(raw
        .iter()
        .map(|r| RATING_MIN + (r - min) / range * (RATING_MAX - RATING_MIN))
        .collect())
}

/// Canonical order: rating descending, then name ascending.
fn canonical_order(a: &QbRating, b: &QbRating) -> Ordering {
    b.qb_rating
        .total_cmp(&a.qb_rating)
        .then_with(|| a.summary.name.cmp(&b.summary.name))
}

/// Rates a population of quarterback summaries.
///
/// The input is borrowed and left untouched. Output is ordered best first,
/// with ranks `1..=N`.
///
/// # Errors
///
/// [`RatingError::InsufficientData`] when `summaries` is empty.
/// [`RatingError::DegenerateDistribution`] under [`DegeneratePolicy::Strict`]
/// when a feature has no spread or every raw score is equal.
#[tracing::instrument(skip(summaries, config), fields(quarterbacks = summaries.len()))]
pub fn rate(summaries: &[QbSummary], config: &RatingConfig) -> Result<Vec<QbRating>, RatingError> {
    if summaries.is_empty() {
        return Err(RatingError::InsufficientData);
    }

    let raw = raw_scores(summaries, config.degenerate_policy)?;
    let scaled = scale(&raw, config.degenerate_policy)?;

    let mut ratings: Vec<QbRating> = summaries
        .iter()
        .zip(raw)
        .zip(scaled)
        .map(|((summary, raw_score), qb_rating)| QbRating {
            summary: summary.clone(),
            raw_score,
            qb_rating,
            rank: 0,
        })
        .collect();

    ratings.sort_by(canonical_order);
    for (i, rating) in ratings.iter_mut().enumerate() {
        rating.rank = i + 1;
    }

    if let Some(top) = ratings.first() {
        info!(
            quarterbacks = ratings.len(),
            top = %top.summary.name,
            top_rating = top.qb_rating,
            "Ratings computed"
        );
    }

    Ok(ratings)
}
