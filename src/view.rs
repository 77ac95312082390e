//! Presentation model over a computed rating table.
//!
//! Search, sort order and per-quarterback cards, plus a cache that keeps the
//! latest computed table so an unchanged dataset is never re-rated.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{QbRating, RatingTable};
use crate::config::RatingConfig;
use crate::images::ImageIndex;

/// Display order for the full rankings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Highest,
    Lowest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highest" | "high" | "desc" => Ok(SortOrder::Highest),
            "lowest" | "low" | "asc" => Ok(SortOrder::Lowest),
            other => Err(format!("unknown sort order '{other}' (expected highest or lowest)")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Highest => write!(f, "highest"),
            SortOrder::Lowest => write!(f, "lowest"),
        }
    }
}

/// Ratings in the requested display order.
pub fn sorted(table: &RatingTable, order: SortOrder) -> Vec<&QbRating> {
    let mut rows: Vec<&QbRating> = table.ratings.iter().collect();
    rows.sort_by_key(|r| r.rank);
    if order == SortOrder::Lowest {
        rows.reverse();
    }
    rows
}

/// Case-insensitive substring search over quarterback names, in name order.
/// An empty query returns every quarterback.
pub fn search<'a>(table: &'a RatingTable, query: &str) -> Vec<&'a QbRating> {
    let needle = query.trim().to_lowercase();
    let mut hits: Vec<&QbRating> = table
        .ratings
        .iter()
        .filter(|r| r.name().to_lowercase().contains(&needle))
        .collect();
    hits.sort_by(|a, b| a.name().cmp(b.name()));
    hits
}

/// Exact name lookup.
pub fn find<'a>(table: &'a RatingTable, name: &str) -> Option<&'a QbRating> {
    table.ratings.iter().find(|r| r.name() == name)
}

/// Overview of one quarterback for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QbCard {
    pub name: String,
    pub team: String,
    pub qb_rating: f64,
    pub rank: usize,
    pub image_url: Option<String>,
}

impl QbCard {
    pub fn new(rating: &QbRating, images: Option<&ImageIndex>) -> Self {
        Self {
            name: rating.name().to_string(),
            team: rating.team().to_string(),
            qb_rating: rating.qb_rating,
            rank: rating.rank,
            image_url: images
                .and_then(|idx| idx.lookup(rating.name()))
                .map(str::to_string),
        }
    }
}

impl fmt::Display for QbCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        match &self.image_url {
            Some(url) => writeln!(f, "  Image: {url}")?,
            None => writeln!(f, "  Image not available")?,
        }
        writeln!(f, "  Team: {}", self.team)?;
        writeln!(f, "  Rating: {:.2}", self.qb_rating)?;
        write!(f, "  Rank: {}", self.rank)
    }
}

/// Identifies one dataset plus the settings it was rated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetVersion {
    fingerprint: u64,
}

impl DatasetVersion {
    pub fn new(bytes: &[u8], season: Option<u16>, config: &RatingConfig) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        season.hash(&mut hasher);
        config.min_plays.hash(&mut hasher);
        config.degenerate_policy.hash(&mut hasher);
        Self {
            fingerprint: hasher.finish(),
        }
    }
}

/// Holds the rating table for the most recent dataset version.
///
/// A new version replaces the previous table; only the latest dataset is
/// ever read back.
#[derive(Debug, Default)]
pub struct RatingCache {
    latest: Option<(DatasetVersion, RatingTable)>,
}

impl RatingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table when `version` matches the latest one,
    /// otherwise builds it and replaces the previous entry.
    /// A failed build leaves the cache unchanged.
    pub fn get_or_build<E>(
        &mut self,
        version: DatasetVersion,
        build: impl FnOnce() -> Result<RatingTable, E>,
    ) -> Result<&RatingTable, E> {
        let entry = match self.latest.take() {
            Some((cached, table)) if cached == version => (cached, table),
            previous => {
                debug!(?version, "Rating cache miss");
                match build() {
                    Ok(table) => (version, table),
                    Err(e) => {
                        self.latest = previous;
                        return Err(e);
                    }
                }
            }
        };
        Ok(&self.latest.insert(entry).1)
    }

    /// Version of the table currently held, if any.
    pub fn version(&self) -> Option<DatasetVersion> {
        self.latest.as_ref().map(|(v, _)| *v)
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::QbSummary;

    fn rating(name: &str, team: &str, qb_rating: f64, rank: usize) -> QbRating {
        QbRating {
            summary: QbSummary {
                name: name.to_string(),
                team: team.to_string(),
                play_count: 400,
                total_epa: 40.0,
                epa_per_play: 0.1,
                avg_cpoe: 1.0,
                total_yards: 3500,
                pass_touchdowns: 25,
                interceptions: 10,
            },
            raw_score: 0.0,
            qb_rating,
            rank,
        }
    }

    fn table() -> RatingTable {
        RatingTable::new(
            Some(2024),
            vec![
                rating("L.Jackson", "BAL", 99.0, 1),
                rating("J.Allen", "BUF", 90.25, 2),
                rating("J.Goff", "DET", 85.0, 3),
                rating("B.Young", "CAR", 50.0, 4),
            ],
        )
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("Highest".parse::<SortOrder>(), Ok(SortOrder::Highest));
        assert_eq!("lowest".parse::<SortOrder>(), Ok(SortOrder::Lowest));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sorted_highest_and_lowest() {
        let t = table();
        let high: Vec<_> = sorted(&t, SortOrder::Highest).iter().map(|r| r.rank).collect();
        let low: Vec<_> = sorted(&t, SortOrder::Lowest).iter().map(|r| r.rank).collect();
        assert_eq!(high, vec![1, 2, 3, 4]);
        assert_eq!(low, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_search_case_insensitive_name_order() {
        let t = table();
        let names: Vec<_> = search(&t, "j.").iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["J.Allen", "J.Goff"]);
        assert_eq!(search(&t, "").len(), 4);
        assert!(search(&t, "mahomes").is_empty());
    }

    #[test]
    fn test_find_exact() {
        let t = table();
        assert_eq!(find(&t, "J.Goff").map(|r| r.rank), Some(3));
        assert!(find(&t, "j.goff").is_none());
    }

    #[test]
    fn test_card_with_and_without_image() {
        let t = table();
        let images =
            ImageIndex::load("qb_name,image_url\nJAllen,https://img.example/allen.png\n".as_bytes())
                .unwrap();

        let allen = QbCard::new(find(&t, "J.Allen").unwrap(), Some(&images));
        assert_eq!(allen.image_url.as_deref(), Some("https://img.example/allen.png"));
        assert_eq!(allen.team, "BUF");
        assert!(allen.to_string().contains("Rating: 90.25"));

        let goff = QbCard::new(find(&t, "J.Goff").unwrap(), Some(&images));
        assert_eq!(goff.image_url, None);
        assert!(goff.to_string().contains("Image not available"));
    }

    #[test]
    fn test_dataset_version_tracks_bytes_and_config() {
        let config = RatingConfig::default();
        let a = DatasetVersion::new(b"abc", Some(2024), &config);
        assert_eq!(a, DatasetVersion::new(b"abc", Some(2024), &config));
        assert_ne!(a, DatasetVersion::new(b"abd", Some(2024), &config));
        assert_ne!(a, DatasetVersion::new(b"abc", Some(2024), &config.clone().with_min_plays(10)));
    }

    #[test]
    fn test_cache_builds_once_per_version() {
        let mut cache = RatingCache::new();
        let version = DatasetVersion::new(b"season", None, &RatingConfig::default());
        let mut builds = 0;

        for _ in 0..3 {
            let t: Result<&RatingTable, String> = cache.get_or_build(version, || {
                builds += 1;
                Ok(table())
            });
            assert_eq!(t.unwrap().len(), 4);
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.version(), Some(version));
    }

    #[test]
    fn test_cache_new_version_replaces_previous() {
        let config = RatingConfig::default();
        let first = DatasetVersion::new(b"week 1", None, &config);
        let second = DatasetVersion::new(b"week 2", None, &config);
        let mut cache = RatingCache::new();
        let mut builds = 0;

        for version in [first, second, first] {
            let t: Result<&RatingTable, String> = cache.get_or_build(version, || {
                builds += 1;
                Ok(table())
            });
            assert!(t.is_ok());
            assert_eq!(cache.version(), Some(version));
        }
        // the first table was evicted by the second, so it is rebuilt
        assert_eq!(builds, 3);
    }

    #[test]
    fn test_cache_failed_build_not_stored() {
        let mut cache = RatingCache::new();
        let version = DatasetVersion::new(b"bad", None, &RatingConfig::default());
        let result: Result<&RatingTable, &str> = cache.get_or_build(version, || Err("no data"));
        assert!(result.is_err());
        assert!(cache.is_empty());

        let good = DatasetVersion::new(b"good", None, &RatingConfig::default());
        let kept: Result<&RatingTable, &str> = cache.get_or_build(good, || Ok(table()));
        assert!(kept.is_ok());
        let failed: Result<&RatingTable, &str> = cache.get_or_build(version, || Err("no data"));
        assert!(failed.is_err());
        assert_eq!(cache.version(), Some(good));
    }
}
