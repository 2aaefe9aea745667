//! Wire envelope decoding.
//!
//! The transport delivers JSON envelopes with optional `events` and
//! `metrics` members, each a map from series id to an update object:
//!
//! ```json
//! {
//!   "metrics": {
//!     "m1": { "time": 100, "value": 5.0,
//!             "tags": ["region:us"], "attributes": { "env": "prod" } }
//!   }
//! }
//! ```
//!
//! Every per-entry field is optional at the decode layer. Validation happens
//! during batch conversion: entries missing `time` or `value` are skipped
//! individually (the rest of the batch still applies) and absent
//! `tags`/`attributes` default to empty. Only a failed decode of the outer
//! envelope is an error, and that is the transport's concern — a batch that
//! failed envelope decoding is never applied.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::EnvelopeError;
use crate::ingest::{Batch, SeriesUpdate};

/// One decoded wire envelope.
///
/// Unknown top-level members are ignored. Entries are keyed by series id;
/// serde does not preserve JSON member order, so entries are held in id
/// order. Each id appears at most once per envelope and samples are
/// per-series, so cross-id order never affects observable state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    /// Event updates by id. Accepted on the wire but never ingested.
    #[serde(default)]
    pub events: Option<BTreeMap<String, WireUpdate>>,
    /// Metric updates by id.
    #[serde(default)]
    pub metrics: Option<BTreeMap<String, WireUpdate>>,
}

/// One raw per-series update as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireUpdate {
    /// Sample timestamp in epoch milliseconds. Required for the entry to
    /// apply.
    #[serde(default)]
    pub time: Option<i64>,
    /// The numeric sample value. Required for the entry to apply.
    #[serde(default)]
    pub value: Option<f64>,
    /// Tags for the series; defaults to none.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Attributes for the series; defaults to none.
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, String>>,
}

impl Envelope {
    /// Decodes an envelope from a JSON document.
    ///
    /// The wire contract is a JSON object; a non-object top level (array,
    /// number, string, ...) is rejected rather than coerced to an empty
    /// envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Decode`] when the input is not valid JSON or
    /// does not match the envelope shape, and [`EnvelopeError::NotAnObject`]
    /// when the top level is not an object.
    pub fn from_json(input: &str) -> Result<Self, EnvelopeError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|source| EnvelopeError::Decode { source })?;

        if !value.is_object() {
            return Err(EnvelopeError::NotAnObject {
                found: json_type_name(&value),
            });
        }

        serde_json::from_value(value).map_err(|source| EnvelopeError::Decode { source })
    }
}

/// Names a JSON value's type for error reporting.
fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Converts a decoded entry map into a validated [`Batch`].
///
/// Entries missing `time` or `value` are malformed: each is skipped with a
/// warning while the remaining entries still convert. Absent `tags` and
/// `attributes` become empty collections. Returns the batch together with
/// the number of entries skipped.
pub fn batch_from_wire(entries: &BTreeMap<String, WireUpdate>) -> (Batch, usize) {
    let mut batch = Batch::new();
    let mut skipped = 0;

    for (id, update) in entries {
        let (Some(time_ms), Some(value)) = (update.time, update.value) else {
            tracing::warn!(series = %id, "skipping malformed entry: missing time or value");
            skipped += 1;
            continue;
        };

        batch.push(SeriesUpdate {
            id: id.clone(),
            time_ms,
            value,
            tags: update
                .tags
                .as_ref()
                .map(|tags| tags.iter().cloned().collect())
                .unwrap_or_default(),
            attributes: update.attributes.clone().unwrap_or_default(),
        });
    }

    (batch, skipped)
}
