//! Play-by-play CSV loading and validation.
//!
//! Reads nflverse-style play-by-play rows into [`PlayRecord`]s. Absent cells
//! (`""`, `NA`, `NaN`) stay distinguishable from zero; present cells that
//! cannot be interpreted fail the whole load with [`LoadError::Validation`].

use std::io::Read;

use serde::Deserialize;
use tracing::debug;

use crate::error::LoadError;

/// Columns the loader needs from the source header.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "play_id",
    "posteam",
    "passer_player_name",
    "epa",
    "cpoe",
    "yards_gained",
    "pass_touchdown",
    "interception",
];

/// Largest gain or loss a single play can record, end zone to end zone.
pub const MAX_PLAY_YARDS: i32 = 110;

/// A single offensive play, as consumed by the aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayRecord {
    pub play_id: Option<String>,
    pub team: Option<String>,
    pub passer_name: Option<String>,
    pub expected_points_added: Option<f64>,
    pub completion_pct_over_expected: Option<f64>,
    pub yards_gained: i32,
    pub is_pass_touchdown: bool,
    pub is_interception: bool,
}

impl PlayRecord {
    /// A play counts toward a quarterback only with a named passer and an EPA value.
    pub fn is_qualifying(&self) -> bool {
        self.passer_name.is_some() && self.expected_points_added.is_some()
    }
}

/// Raw CSV row, before presence and range checks.
#[derive(Debug, Deserialize)]
struct RawPlay {
    play_id: Option<String>,
    posteam: Option<String>,
    passer_player_name: Option<String>,
    epa: Option<String>,
    cpoe: Option<String>,
    yards_gained: Option<String>,
    pass_touchdown: Option<String>,
    interception: Option<String>,
}

/// Result of a successful load.
#[derive(Debug, Default)]
pub struct LoadedPlays {
    pub plays: Vec<PlayRecord>,
    pub rows_read: usize,
}

fn is_absent(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan")
}

fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|v| !is_absent(v)).map(|v| v.trim().to_string())
}

fn parse_number(row: u64, column: &'static str, cell: Option<String>) -> Result<Option<f64>, LoadError> {
    let Some(raw) = present(cell) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(LoadError::Validation {
            row,
            column,
            value: raw,
            reason: "not a finite number",
        }),
    }
}

fn parse_yards(row: u64, cell: Option<String>) -> Result<i32, LoadError> {
    let raw = cell.clone().unwrap_or_default();
    let invalid = |reason| LoadError::Validation {
        row,
        column: "yards_gained",
        value: raw.trim().to_string(),
        reason,
    };
    match parse_number(row, "yards_gained", cell)? {
        None => Ok(0),
        Some(v) if v.fract() != 0.0 => Err(invalid("yardage must be a whole number")),
        Some(v) if v.abs() > f64::from(MAX_PLAY_YARDS) => {
            Err(invalid("yardage is longer than the field"))
        }
        Some(v) => Ok(v as i32),
    }
}

fn parse_flag(row: u64, column: &'static str, cell: Option<String>) -> Result<bool, LoadError> {
    let raw = cell.clone().unwrap_or_default();
    match parse_number(row, column, cell)? {
        None => Ok(false),
        Some(v) if v == 0.0 => Ok(false),
        Some(v) if v == 1.0 => Ok(true),
        Some(_) => Err(LoadError::Validation {
            row,
            column,
            value: raw.trim().to_string(),
            reason: "flag must be 0 or 1",
        }),
    }
}

impl RawPlay {
    fn into_record(self, row: u64) -> Result<PlayRecord, LoadError> {
        Ok(PlayRecord {
            play_id: present(self.play_id),
            team: present(self.posteam),
            passer_name: present(self.passer_player_name),
            expected_points_added: parse_number(row, "epa", self.epa)?,
            completion_pct_over_expected: parse_number(row, "cpoe", self.cpoe)?,
            yards_gained: parse_yards(row, self.yards_gained)?,
            is_pass_touchdown: parse_flag(row, "pass_touchdown", self.pass_touchdown)?,
            is_interception: parse_flag(row, "interception", self.interception)?,
        })
    }
}

/// Reads and validates every play in a headed CSV stream.
///
/// # Errors
///
/// Returns an error if a required column is missing, the CSV is malformed, or
/// any present cell fails validation.
#[tracing::instrument(skip(reader))]
pub fn load_plays<R: Read>(reader: R) -> Result<LoadedPlays, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(false).from_reader(reader);
    let headers = rdr.headers()?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut loaded = LoadedPlays::default();
    for result in rdr.records() {
        let record = result?;
        let row = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawPlay = record.deserialize(Some(&headers))?;
        loaded.plays.push(raw.into_record(row)?);
        loaded.rows_read += 1;
    }

    debug!(rows = loaded.rows_read, "Play-by-play rows loaded");
    Ok(loaded)
}
