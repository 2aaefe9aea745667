//! Orchestration: receive an envelope, apply it, resolve common labels, and
//! publish the updated dataset.
//!
//! The processing model is single-threaded and event-driven: exactly one
//! envelope is processed at a time, strictly in arrival order, and
//! [`on_batch`] runs apply and resolve back to back with no suspension
//! between them. External readers therefore only ever observe a dataset in
//! the state "all updates from some prefix of received batches, fully
//! resolved" — never mid-ingest. A reimplementation on top of multiple
//! threads must preserve this by funneling all envelopes through a single
//! consumer.

use crate::dataset::Dataset;
use crate::ingest::{self, Batch};
use crate::resolve;
use crate::wire::{self, Envelope};

/// Telemetry category, one dataset each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Metric series. The only category with an ingestion path.
    Metrics,
    /// Event series. Declared on the wire but never ingested.
    Events,
}

impl Category {
    /// Returns the category's wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Metrics => "metrics",
            Category::Events => "events",
        }
    }
}

/// The rendering collaborator's seam.
///
/// A sink receives the dataset after every fully resolved batch. The dataset
/// is read-only from the sink's perspective; whatever the sink does with it
/// (render, fan out, drop) is its own concern, including its own error
/// handling.
pub trait DatasetSink {
    /// Publishes the current state of one category's dataset.
    fn publish(&mut self, category: Category, dataset: &Dataset);
}

/// A no-op sink, useful when only the in-memory state matters.
impl DatasetSink for () {
    fn publish(&mut self, _category: Category, _dataset: &Dataset) {}
}

/// Counts from processing one envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Metric entries applied to the dataset.
    pub applied: usize,
    /// Malformed metric entries skipped.
    pub skipped: usize,
    /// Event entries accepted but not ingested.
    pub events_ignored: usize,
}

/// Applies a batch and unconditionally resolves the dataset's common labels.
///
/// This pairing is the atomic unit of the pipeline: no reader may observe
/// the dataset between the two steps, which the single-threaded processing
/// model guarantees by construction.
pub fn on_batch(dataset: &mut Dataset, batch: &Batch) {
    ingest::apply(dataset, batch);
    resolve::resolve(dataset);
}

/// Owns the per-category datasets and drives the pipeline for each received
/// envelope.
pub struct MessageHandler<S> {
    metrics: Dataset,
    events: Dataset,
    sink: S,
}

impl<S: DatasetSink> MessageHandler<S> {
    /// Creates a handler with empty datasets for both categories.
    pub fn new(sink: S) -> Self {
        Self {
            metrics: Dataset::new(),
            events: Dataset::new(),
            sink,
        }
    }

    /// Processes one envelope: convert, apply, resolve, publish.
    ///
    /// Metric entries missing `time` or `value` are skipped individually;
    /// the rest of the envelope still applies. Event entries are counted and
    /// dropped — the events dataset is never mutated.
    pub fn on_envelope(&mut self, envelope: &Envelope) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        if let Some(entries) = &envelope.events {
            outcome.events_ignored = entries.len();
        }

        if let Some(entries) = &envelope.metrics {
            let (batch, skipped) = wire::batch_from_wire(entries);
            outcome.applied = batch.len();
            outcome.skipped = skipped;

            // A present-but-empty metrics member still counts as a batch:
            // resolve runs and the dataset is republished.
            on_batch(&mut self.metrics, &batch);
            self.sink.publish(Category::Metrics, &self.metrics);
        }

        tracing::debug!(
            applied = outcome.applied,
            skipped = outcome.skipped,
            events_ignored = outcome.events_ignored,
            series = self.metrics.series_count(),
            "processed envelope"
        );

        outcome
    }

    /// Returns the metrics dataset.
    pub fn metrics(&self) -> &Dataset {
        &self.metrics
    }

    /// Returns the events dataset. Exists for the process lifetime but is
    /// never mutated by this crate.
    pub fn events(&self) -> &Dataset {
        &self.events
    }

    /// Consumes the handler, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
