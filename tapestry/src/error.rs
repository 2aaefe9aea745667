//! Error types for the tapestry stream index.
//!
//! The ingest and resolve paths never fail: malformed batch entries are
//! skipped entry-by-entry and absent label data defaults to empty, so the
//! only errors this crate surfaces are envelope-level decode failures at the
//! transport boundary.

use thiserror::Error;

/// The main error type for all tapestry operations.
#[derive(Error, Debug)]
pub enum TapestryError {
    /// Error decoding a wire envelope.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
}

/// Errors that can occur while decoding a wire envelope.
///
/// An envelope that fails to decode is a transport-level failure: none of its
/// entries are applied. Per-entry problems (missing `time` or `value`) are
/// not errors — those entries are skipped during batch conversion and the
/// rest of the envelope still applies.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// The envelope body is not valid JSON or does not have the expected
    /// top-level shape.
    #[error("failed to decode envelope: {source}")]
    Decode {
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },

    /// The envelope body parsed as JSON but its top level is not an object.
    ///
    /// Derived deserialization would also accept a sequence positionally;
    /// the wire contract is an object, so anything else is rejected here.
    #[error("envelope must be a JSON object, found {found}")]
    NotAnObject {
        /// The JSON type actually found at the top level.
        found: &'static str,
    },
}

/// Type alias for `Result<T, TapestryError>`.
pub type Result<T> = std::result::Result<T, TapestryError>;
