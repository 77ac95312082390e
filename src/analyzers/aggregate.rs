use std::collections::HashMap;

use tracing::{debug, info};

use crate::analyzers::types::QbSummary;
use crate::plays::PlayRecord;

/// Running totals for one passer while scanning plays.
#[derive(Default)]
struct SummaryBuilder {
    /// Team votes in first-seen order, so ties resolve to the earliest team.
    teams: Vec<(String, usize)>,
    play_count: usize,
    total_epa: f64,
    cpoe_sum: f64,
    cpoe_count: usize,
    total_yards: i64,
    pass_touchdowns: u32,
    interceptions: u32,
}

impl SummaryBuilder {
    fn push(&mut self, play: &PlayRecord, epa: f64) {
        if let Some(team) = &play.team {
            match self.teams.iter_mut().find(|(t, _)| t == team) {
                Some((_, votes)) => *votes += 1,
                None => self.teams.push((team.clone(), 1)),
            }
        }

        self.play_count += 1;
        self.total_epa += epa;

        if let Some(cpoe) = play.completion_pct_over_expected {
            self.cpoe_sum += cpoe;
            self.cpoe_count += 1;
        }

        self.total_yards += i64::from(play.yards_gained);
        self.pass_touchdowns += u32::from(play.is_pass_touchdown);
        self.interceptions += u32::from(play.is_interception);
    }

    fn team(&self) -> String {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.teams {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(team, _)| team.clone()).unwrap_or_default()
    }

    fn finish(self, name: String) -> QbSummary {
        let avg_cpoe = if self.cpoe_count == 0 {
            f64::NAN
        } else {
            self.cpoe_sum / self.cpoe_count as f64
        };

        QbSummary {
            team: self.team(),
            name,
            play_count: self.play_count,
            total_epa: self.total_epa,
            epa_per_play: self.total_epa / self.play_count as f64,
            avg_cpoe,
            total_yards: self.total_yards,
            pass_touchdowns: self.pass_touchdowns,
            interceptions: self.interceptions,
        }
    }
}

/// Aggregates raw plays into one [`QbSummary`] per passer.
///
/// Plays without a passer or without an EPA value are skipped entirely.
/// Passers with fewer than `min_plays` qualifying plays are dropped. The
/// result is ordered by name.
#[tracing::instrument(skip(plays), fields(plays = plays.len()))]
pub fn aggregate(plays: &[PlayRecord], min_plays: usize) -> Vec<QbSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut builders: Vec<(&str, SummaryBuilder)> = Vec::new();

    let mut missing_passer = 0usize;
    let mut missing_epa = 0usize;

    for play in plays {
        let Some(name) = play.passer_name.as_deref() else {
            missing_passer += 1;
            continue;
        };
        let Some(epa) = play.expected_points_added else {
            missing_epa += 1;
            continue;
        };

        let slot = *index.entry(name).or_insert_with(|| {
            builders.push((name, SummaryBuilder::default()));
            builders.len() - 1
        });
        builders[slot].1.push(play, epa);
    }

    debug!(missing_passer, missing_epa, "Non-qualifying plays skipped");

    let passers = builders.len();
    let mut summaries: Vec<QbSummary> = builders
        .into_iter()
        .filter(|(_, b)| b.play_count >= min_plays)
        .map(|(name, b)| b.finish(name.to_string()))
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name));

    info!(
        passers,
        qualified = summaries.len(),
        min_plays,
        "Quarterback aggregation complete"
    );

    summaries
}
