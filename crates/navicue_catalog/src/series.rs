//! Series metadata tables
//!
//! Const tables describing the catalog's narrative series. Specimen counts
//! are the planned catalog size, not what ships in this crate.

use serde::Serialize;

/// Metadata for one narrative series
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SeriesMeta {
    pub id: &'static str,
    pub title: &'static str,
    /// One-line description of the series arc
    pub arc: &'static str,
    /// Planned specimen count for the full catalog
    pub planned: u32,
}

/// All series, in presentation order
pub const SERIES: &[SeriesMeta] = &[
    SeriesMeta {
        id: "first_breaths",
        title: "First Breaths",
        arc: "Arriving in the body through breath-synced pulses",
        planned: 240,
    },
    SeriesMeta {
        id: "holding_ground",
        title: "Holding Ground",
        arc: "Commitment through sustained press-and-hold gestures",
        planned: 260,
    },
    SeriesMeta {
        id: "word_rituals",
        title: "Word Rituals",
        arc: "Phrases that materialize one letter at a time",
        planned: 250,
    },
    SeriesMeta {
        id: "receipts",
        title: "Receipts",
        arc: "Sealing ceremonies that acknowledge what was offered",
        planned: 250,
    },
];

/// Find a series by id
pub fn find(id: &str) -> Option<&'static SeriesMeta> {
    SERIES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_ids_unique() {
        for (i, a) in SERIES.iter().enumerate() {
            for b in &SERIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("receipts").unwrap().title, "Receipts");
        assert!(find("nope").is_none());
    }
}
