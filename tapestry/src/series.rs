//! Series data entity: one labeled time series and its sample history.
//!
//! A [`Series`] is created the first time its id appears in an ingested
//! batch. Its `tags` and `attributes` are fixed at that point; later updates
//! for the same id only extend the sample history. The derived
//! `identifying_tags` / `identifying_keys` fields are rewritten by every
//! resolve pass (see [`crate::resolve`]) and are never stale relative to the
//! owning dataset's common-label summary.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

/// Opaque series identifier, unique within a [`Dataset`](crate::Dataset).
pub type SeriesId = String;

/// One recorded observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Sample timestamp in epoch milliseconds.
    #[serde(rename = "time")]
    pub time_ms: i64,
    /// The numeric sample value.
    pub value: f64,
}

/// One time series: fixed labels plus an arrival-ordered sample history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Series identifier, unique within the owning dataset.
    pub id: SeriesId,
    /// Unary labels. Duplicates collapse; only membership matters.
    pub tags: BTreeSet<String>,
    /// Key/value labels. Keys are unique.
    pub attributes: BTreeMap<String, String>,
    /// Tags not shared by every series in the dataset, ascending.
    ///
    /// Derived: equals `tags − common_tags` after every resolve pass.
    pub identifying_tags: Vec<String>,
    /// Attribute keys whose key/value pair is not shared by every series in
    /// the dataset, ascending.
    ///
    /// Derived: rewritten by every resolve pass.
    pub identifying_keys: Vec<String>,
    /// Sample history, most recent arrival first.
    ///
    /// Ordered purely by arrival, never by timestamp value, and never
    /// truncated by this crate. Growth is unbounded by contract; retention
    /// is a collaborator's concern. A deque keeps the front-insert O(1) on
    /// that ever-growing history.
    pub values: VecDeque<Sample>,
}

impl Series {
    /// Creates a new series seeded with its first sample.
    ///
    /// The given `tags` and `attributes` are fixed for the lifetime of the
    /// series; subsequent updates for the same id never change them.
    pub fn new(
        id: SeriesId,
        tags: BTreeSet<String>,
        attributes: BTreeMap<String, String>,
        first: Sample,
    ) -> Self {
        Self {
            id,
            tags,
            attributes,
            identifying_tags: Vec::new(),
            identifying_keys: Vec::new(),
            values: VecDeque::from([first]),
        }
    }

    /// Records a sample at the front of the history.
    ///
    /// Identical timestamps are not deduplicated and samples are not
    /// reordered: arrival order is authoritative.
    pub fn record(&mut self, sample: Sample) {
        self.values.push_front(sample);
    }

    /// Returns the most recently recorded sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.values.front()
    }
}
