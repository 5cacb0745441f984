//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A business method was called in a state that does not allow it.
    #[error("invalid state transition on {aggregate_type} {aggregate_id}: cannot go from {from} to {to}")]
    InvalidStateTransition {
        /// Aggregate type name, e.g. `Post`.
        aggregate_type: &'static str,
        /// The aggregate that rejected the transition.
        aggregate_id: Uuid,
        /// Current state.
        from: String,
        /// Requested state.
        to: String,
    },

    /// Handing an event to the publisher failed.
    #[error("failed to publish event {event_id}: {reason}")]
    Publish {
        /// The event that could not be published.
        event_id: Uuid,
        /// Transport-specific reason.
        reason: String,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
