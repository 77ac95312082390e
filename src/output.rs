//! Output formatting and persistence for rating tables.
//!
//! Supports a plain-text rankings table, JSON serialization, and CSV export.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{QbRating, RatingTable};

/// Flat CSV row for one rated quarterback.
#[derive(Debug, Serialize)]
struct RatingRow<'a> {
    rank: usize,
    name: &'a str,
    team: &'a str,
    qb_rating: f64,
    raw_score: f64,
    play_count: usize,
    total_epa: f64,
    epa_per_play: f64,
    avg_cpoe: Option<f64>,
    total_yards: i64,
    pass_tds: u32,
    ints: u32,
}

impl<'a> From<&'a QbRating> for RatingRow<'a> {
    fn from(r: &'a QbRating) -> Self {
        let s = &r.summary;
        RatingRow {
            rank: r.rank,
            name: &s.name,
            team: &s.team,
            qb_rating: r.qb_rating,
            raw_score: r.raw_score,
            play_count: s.play_count,
            total_epa: s.total_epa,
            epa_per_play: s.epa_per_play,
            avg_cpoe: s.avg_cpoe.is_finite().then_some(s.avg_cpoe),
            total_yards: s.total_yards,
            pass_tds: s.pass_touchdowns,
            ints: s.interceptions,
        }
    }
}

fn fmt_stat(v: f64) -> String {
    if v.is_finite() {
        format!("{:.2}", v)
    } else {
        "-".to_string()
    }
}

/// Renders ratings as an aligned text table in the order given.
pub fn render_table(rows: &[&QbRating]) -> String {
    if rows.is_empty() {
        return "No qualifying quarterbacks.".to_string();
    }

    let name_width = rows
        .iter()
        .map(|r| r.name().chars().count())
        .max()
        .unwrap_or(0)
        .max("name".len());

    let mut out = format!(
        "{:>4}  {:<name_width$}  {:<4}  {:>9}  {:>12}  {:>8}  {:>11}  {:>8}  {:>4}\n",
        "rank", "name", "team", "qb_rating", "epa_per_play", "avg_cpoe", "total_yards", "pass_tds", "ints",
    );

    for r in rows {
        let s = &r.summary;
        out.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<4}  {:>9.2}  {:>12}  {:>8}  {:>11}  {:>8}  {:>4}\n",
            r.rank,
            s.name,
            s.team,
            r.qb_rating,
            fmt_stat(s.epa_per_play),
            fmt_stat(s.avg_cpoe),
            s.total_yards,
            s.pass_touchdowns,
            s.interceptions,
        ));
    }

    out
}

/// Serializes a rating table as pretty-printed JSON.
pub fn to_json(table: &RatingTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Writes ratings as CSV rows, with a header, in the order given.
pub fn write_csv<W: Write>(writer: W, rows: &[&QbRating]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for r in rows {
        writer.serialize(RatingRow::from(*r))?;
    }
    writer.flush()?;
    debug!(rows = rows.len(), "CSV ratings written");
    Ok(())
}
