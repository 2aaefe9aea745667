//! Dataset data entity: all known series for one telemetry category plus the
//! computed common-label summary.
//!
//! One dataset exists per telemetry category ([`Category`]) for the process
//! lifetime. Series are created on first sight of their id and never deleted
//! by this crate. The `common_tags` / `common_attributes` summary carries no
//! state of its own between resolve passes: it is fully recomputed from
//! `datapoints` on every batch.
//!
//! [`Category`]: crate::Category

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::series::{Series, SeriesId};

/// A named collection of series with its common-label summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Tags present in every series. Empty when the dataset has no series.
    pub common_tags: BTreeSet<String>,
    /// Key/value pairs present with an identical value in every series.
    pub common_attributes: BTreeMap<String, String>,
    /// All known series, keyed by id. Insertion order is irrelevant.
    pub datapoints: HashMap<SeriesId, Series>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the series with the given id, if known.
    pub fn get(&self, id: &str) -> Option<&Series> {
        self.datapoints.get(id)
    }

    /// Returns the number of known series.
    pub fn series_count(&self) -> usize {
        self.datapoints.len()
    }

    /// Returns `true` when no series have been ingested.
    pub fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }

    /// Iterates over all known series in unspecified order.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.datapoints.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Sample;

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new();
        assert!(dataset.is_empty());
        assert_eq!(dataset.series_count(), 0);
        assert!(dataset.common_tags.is_empty());
        assert!(dataset.common_attributes.is_empty());
        assert!(dataset.get("m1").is_none());
    }

    #[test]
    fn test_get_and_count() {
        let mut dataset = Dataset::new();
        dataset.datapoints.insert(
            "m1".to_string(),
            Series::new(
                "m1".to_string(),
                BTreeSet::new(),
                BTreeMap::new(),
                Sample {
                    time_ms: 0,
                    value: 1.0,
                },
            ),
        );

        assert_eq!(dataset.series_count(), 1);
        assert_eq!(dataset.get("m1").unwrap().id, "m1");
    }
}
