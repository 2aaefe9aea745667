//! Common-label resolution: recomputing a dataset's shared tags and
//! attributes and every series' distinguishing labels.
//!
//! [`resolve`] is a full recomputation over all series, run after every
//! applied batch. It is intentionally non-incremental: the summary is
//! reconstructible from `datapoints` alone and carries no state between
//! passes. Intersection and the attribute filter are commutative, so the
//! result is independent of the order series are visited.

use crate::dataset::Dataset;

/// Recomputes `common_tags` / `common_attributes` for the dataset and
/// rewrites every series' `identifying_tags` / `identifying_keys`.
///
/// With zero series both common sets are empty. Otherwise the common sets
/// are seeded from an arbitrary first series and narrowed against the rest:
/// a tag survives only when every series carries it; an attribute key
/// survives only when every series carries it with the same value. Each
/// series' identifying tags are then `tags − common_tags` and its
/// identifying keys are the attribute keys whose key/value pair is not
/// common, both in ascending order.
///
/// The pass is idempotent: resolving twice without an intervening apply
/// leaves the dataset unchanged.
pub fn resolve(dataset: &mut Dataset) {
    let mut series_iter = dataset.datapoints.values();
    let Some(first) = series_iter.next() else {
        dataset.common_tags.clear();
        dataset.common_attributes.clear();
        return;
    };

    let mut common_tags = first.tags.clone();
    let mut common_attributes = first.attributes.clone();

    for series in series_iter {
        common_tags = common_tags.intersection(&series.tags).cloned().collect();
        common_attributes.retain(|key, value| {
            series.attributes.get(key).is_some_and(|v| v == value)
        });
    }

    for series in dataset.datapoints.values_mut() {
        series.identifying_tags = series.tags.difference(&common_tags).cloned().collect();
        series.identifying_keys = series
            .attributes
            .iter()
            .filter(|&(key, value)| common_attributes.get(key.as_str()) != Some(value))
            .map(|(key, _)| key.clone())
            .collect();
    }

    dataset.common_tags = common_tags;
    dataset.common_attributes = common_attributes;
}
