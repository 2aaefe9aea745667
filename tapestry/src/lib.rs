//! # tapestry
//!
//! Incremental common-label index for streamed metric series.
//!
//! tapestry ingests batched updates of labeled, timestamped numeric samples,
//! keeps a per-series history, and recomputes on every batch which tags and
//! attributes are shared by *all* currently known series — so each series
//! can be displayed with only the labels that distinguish it.
//!
//! ## Key Properties
//!
//! - Pure in-memory, synchronous core: no I/O, no background threads
//! - Full recomputation of the common-label summary on every batch — the
//!   summary is never stale and never incrementally patched
//! - Deterministic, ascending order for all derived label sequences
//! - Defensive wire handling: malformed entries skip individually, absent
//!   label data defaults to empty
//! - Histories are unbounded by contract; retention is a collaborator's job
//!
//! ## Quick Start
//!
//! ```rust
//! use tapestry::{Envelope, MessageHandler};
//!
//! # fn main() -> tapestry::Result<()> {
//! let mut handler = MessageHandler::new(());
//!
//! let envelope = Envelope::from_json(
//!     r#"{"metrics": {
//!         "x": {"time": 100, "value": 5.0,
//!               "tags": ["region:us", "host:h1"],
//!               "attributes": {"env": "prod"}},
//!         "y": {"time": 100, "value": 7.0,
//!               "tags": ["region:us", "host:h2"],
//!               "attributes": {"env": "prod"}}
//!     }}"#,
//! )?;
//! handler.on_envelope(&envelope);
//!
//! let metrics = handler.metrics();
//! assert!(metrics.common_tags.contains("region:us"));
//! assert_eq!(metrics.common_attributes["env"], "prod");
//! assert_eq!(metrics.get("x").unwrap().identifying_tags, ["host:h1"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`Series`] — one time series' fixed labels plus sample history
//! - [`Dataset`] — all series for one telemetry category plus the computed
//!   common-label summary
//! - [`apply`] — applies one batch of updates to a dataset
//! - [`resolve`] — recomputes common tags/attributes and per-series
//!   identifying labels
//! - [`MessageHandler`] — receive envelope → apply → resolve → publish to a
//!   [`DatasetSink`]
//!
//! ## Modules
//!
//! For lower-level access, the individual modules are also public:
//!
//! - [`series`] — series and sample data entities
//! - [`dataset`] — dataset data entity
//! - [`ingest`] — batch types and the ingestion pass
//! - [`resolve`] — the common-label resolution pass
//! - [`handler`] — orchestration and the sink seam
//! - [`wire`] — JSON envelope decoding
//! - [`error`] — error types

pub mod dataset;
pub mod error;
pub mod handler;
pub mod ingest;
pub mod resolve;
pub mod series;
pub mod wire;

// Re-export primary API types at crate root for convenience.
pub use dataset::Dataset;
pub use error::{EnvelopeError, Result, TapestryError};
pub use handler::{BatchOutcome, Category, DatasetSink, MessageHandler, on_batch};
pub use ingest::{Batch, SeriesUpdate, apply};
pub use resolve::resolve;
pub use series::{Sample, Series, SeriesId};
pub use wire::{Envelope, WireUpdate, batch_from_wire};
