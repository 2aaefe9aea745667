//! Stream ingestion: applying one batch of updates to a dataset.
//!
//! [`apply`] creates a series on first sight of an id and front-inserts a
//! sample on every later sight. A series' labels are fixed when it is
//! created: an existing id reappearing with different tags or attributes is
//! a defined policy (the later labels are ignored), not an error.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::Dataset;
use crate::series::{Sample, Series, SeriesId};

/// One validated update for a single series.
///
/// `tags` and `attributes` are already defaulted to empty here: absent label
/// data on the wire never propagates an undefined value into set or map
/// operations (see [`crate::wire`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesUpdate {
    /// Target series id.
    pub id: SeriesId,
    /// Sample timestamp in epoch milliseconds.
    pub time_ms: i64,
    /// The numeric sample value.
    pub value: f64,
    /// Tags for the series, used only when the id is first seen.
    pub tags: BTreeSet<String>,
    /// Attributes for the series, used only when the id is first seen.
    pub attributes: BTreeMap<String, String>,
}

/// One delivered unit of updates, covering zero or more series by id.
///
/// Entry order is the batch's arrival order, which is authoritative for the
/// ordering of each series' sample history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    entries: Vec<SeriesUpdate>,
}

impl Batch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an update to the batch.
    pub fn push(&mut self, update: SeriesUpdate) {
        self.entries.push(update);
    }

    /// Returns the number of updates in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the batch carries no updates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the updates in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesUpdate> {
        self.entries.iter()
    }
}

impl From<Vec<SeriesUpdate>> for Batch {
    fn from(entries: Vec<SeriesUpdate>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a SeriesUpdate;
    type IntoIter = std::slice::Iter<'a, SeriesUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Applies one batch of updates to a dataset, in the batch's order.
///
/// For each update: an unknown id creates a new [`Series`] seeded with the
/// update's labels and a single sample; a known id front-inserts the sample
/// and ignores the update's labels. Identical timestamps are not
/// deduplicated and samples are never reordered by time.
///
/// Mutates `dataset.datapoints` in place. The common-label summary is *not*
/// updated here; callers pair this with [`crate::resolve::resolve`] (or use
/// [`crate::handler::on_batch`]).
pub fn apply(dataset: &mut Dataset, batch: &Batch) {
    for update in batch {
        let sample = Sample {
            time_ms: update.time_ms,
            value: update.value,
        };

        match dataset.datapoints.entry(update.id.clone()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().record(sample),
            Entry::Vacant(vacant) => {
                vacant.insert(Series::new(
                    update.id.clone(),
                    update.tags.clone(),
                    update.attributes.clone(),
                    sample,
                ));
            }
        }
    }
}
