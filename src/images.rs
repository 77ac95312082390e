//! Quarterback headshot lookup, keyed by a normalized name.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use tracing::debug;

use crate::error::LoadError;

/// Strips whitespace and ASCII punctuation, so `"J. Allen"` and `"J.Allen"`
/// both become `"JAllen"`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .collect()
}

#[derive(Debug, Deserialize)]
struct ImageRow {
    qb_name: String,
    image_url: String,
}

/// Maps normalized quarterback names to image URLs.
#[derive(Debug, Default)]
pub struct ImageIndex {
    entries: HashMap<String, String>,
}

impl ImageIndex {
    /// Loads a headed CSV with `qb_name` and `image_url` columns.
    /// Later rows win when two names normalize to the same key.
    pub fn load<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut entries = HashMap::new();

        for result in rdr.deserialize() {
            let row: ImageRow = result?;
            if row.image_url.trim().is_empty() {
                continue;
            }
            entries.insert(normalize_name(&row.qb_name), row.image_url.trim().to_string());
        }

        debug!(images = entries.len(), "Image index loaded");
        Ok(Self { entries })
    }

    /// Returns the image URL for a display name, if one is known.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&normalize_name(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("P.Mahomes"), "PMahomes");
        assert_eq!(normalize_name("J. Allen"), "JAllen");
        assert_eq!(normalize_name("A.St. Brown"), "AStBrown");
        assert_eq!(normalize_name("D'Andre Swift"), "DAndreSwift");
    }

    #[test]
    fn test_lookup_matches_normalized_name() {
        let csv = "qb_name,image_url\nPMahomes,https://img.example/mahomes.png\nJAllen,https://img.example/allen.png\n";
        let index = ImageIndex::load(csv.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("P.Mahomes"), Some("https://img.example/mahomes.png"));
        assert_eq!(index.lookup("J. Allen"), Some("https://img.example/allen.png"));
        assert_eq!(index.lookup("L.Jackson"), None);
    }

    #[test]
    fn test_blank_urls_skipped() {
        let csv = "qb_name,image_url\nPMahomes,\n";
        let index = ImageIndex::load(csv.as_bytes()).unwrap();
        assert!(index.is_empty());
    }
}
