//! Domain event abstractions.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::EventContext;

/// Payload schema version assigned when a variant does not override it.
pub const DEFAULT_EVENT_VERSION: u32 = 1;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier. This is the event's identity.
    pub event_id: Uuid,
    /// Stable discriminator chosen by the event variant.
    pub event_type: String,
    /// Aggregate this event is about.
    pub aggregate_id: Uuid,
    /// Aggregate family name, e.g. `Post`.
    pub aggregate_type: String,
    /// Schema version of the payload, starting at 1.
    pub event_version: u32,
    /// Shared by every event of one causal chain.
    pub correlation_id: Option<Uuid>,
    /// Identifier of the event that directly triggered this one.
    pub causation_id: Option<Uuid>,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// Creates metadata for a root event with a fresh event id.
    #[must_use]
    pub fn new(
        aggregate_id: Uuid,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.into(),
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            event_version: DEFAULT_EVENT_VERSION,
            correlation_id: None,
            causation_id: None,
            occurred_at,
        }
    }

    /// Replaces the generated event id.
    #[must_use]
    pub fn with_event_id(mut self, event_id: Uuid) -> Self {
        self.event_id = event_id;
        self
    }

    /// Replaces the captured timestamp.
    #[must_use]
    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// Sets the payload schema version.
    #[must_use]
    pub fn with_event_version(mut self, event_version: u32) -> Self {
        self.event_version = event_version;
        self
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Links this event to the event that triggered it.
    ///
    /// The correlation id is taken as given; `None` stays `None`.
    #[must_use]
    pub fn caused_by(mut self, causation_id: Uuid, correlation_id: Option<Uuid>) -> Self {
        self.causation_id = Some(causation_id);
        self.correlation_id = correlation_id;
        self
    }
}

/// Trait that all domain events implement.
///
/// Events are immutable facts. Equality between events is identity: two
/// events are the same event iff their `event_id`s match.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// Returns the circumstances the event was recorded under, if the
    /// variant carries them.
    fn event_context(&self) -> Option<&EventContext> {
        None
    }

    /// Serializes the variant-specific payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be represented as
    /// JSON (e.g. a map with non-string keys).
    fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error>;

    /// Unique event identifier.
    fn event_id(&self) -> Uuid {
        self.metadata().event_id
    }

    /// Aggregate this event is about.
    fn aggregate_id(&self) -> Uuid {
        self.metadata().aggregate_id
    }

    /// Stable event discriminator.
    fn event_type(&self) -> &str {
        &self.metadata().event_type
    }

    /// Aggregate family name.
    fn aggregate_type(&self) -> &str {
        &self.metadata().aggregate_type
    }

    /// Payload schema version.
    fn event_version(&self) -> u32 {
        self.metadata().event_version
    }

    /// When the event was recorded.
    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata().occurred_at
    }

    /// Correlation id of the chain this event belongs to.
    fn correlation_id(&self) -> Option<Uuid> {
        self.metadata().correlation_id
    }

    /// Event id of the direct trigger, `None` for root events.
    fn causation_id(&self) -> Option<Uuid> {
        self.metadata().causation_id
    }

    /// Exact match against `event_type`.
    fn is_event_type(&self, event_type: &str) -> bool {
        self.event_type() == event_type
    }

    /// Exact match against `aggregate_id`.
    fn is_from_aggregate(&self, aggregate_id: Uuid) -> bool {
        self.aggregate_id() == aggregate_id
    }

    /// Strictly earlier than `instant`.
    fn occurred_before(&self, instant: DateTime<Utc>) -> bool {
        self.occurred_at() < instant
    }

    /// Strictly later than `instant`.
    fn occurred_after(&self, instant: DateTime<Utc>) -> bool {
        self.occurred_at() > instant
    }

    /// Builds an event caused by this one.
    ///
    /// `build` receives this event's id as the causation id and this event's
    /// correlation id unchanged. A missing correlation id is not synthesized.
    fn follow_up<E, F>(&self, build: F) -> E
    where
        Self: Sized,
        F: FnOnce(Uuid, Option<Uuid>) -> E,
    {
        build(self.event_id(), self.correlation_id())
    }
}

impl PartialEq for dyn DomainEvent {
    fn eq(&self, other: &Self) -> bool {
        self.event_id() == other.event_id()
    }
}

impl Eq for dyn DomainEvent {}

impl Hash for dyn DomainEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event_id().hash(state);
    }
}
