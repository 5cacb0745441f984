//! Serialization shape and metadata extraction for domain events.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::EventContext;
use crate::event::DomainEvent;

/// Transport-neutral representation of a domain event, suitable for
/// serializing to JSON for a broker, an outbox row or a log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Event discriminator.
    pub event_type: String,
    /// Payload schema version.
    pub event_version: u32,
    /// Aggregate this event is about.
    pub aggregate_id: Uuid,
    /// Aggregate family name.
    pub aggregate_type: String,
    /// Chain correlation id.
    pub correlation_id: Option<Uuid>,
    /// Direct trigger's event id.
    pub causation_id: Option<Uuid>,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Recording circumstances, if the event carries them.
    pub context: Option<EventContext>,
    /// Serialized variant payload.
    pub payload: serde_json::Value,
}

impl EventRecord {
    /// Builds the record for any domain event.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be represented as
    /// JSON.
    pub fn from_event(event: &dyn DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: event.event_id(),
            event_type: event.event_type().to_owned(),
            event_version: event.event_version(),
            aggregate_id: event.aggregate_id(),
            aggregate_type: event.aggregate_type().to_owned(),
            correlation_id: event.correlation_id(),
            causation_id: event.causation_id(),
            occurred_at: event.occurred_at(),
            context: event.event_context().cloned(),
            payload: event.to_payload()?,
        })
    }
}

/// Flattens an event's metadata and context into string key/value pairs,
/// e.g. for message headers or structured log fields.
///
/// Absent optional values are omitted. Context metadata entries are prefixed
/// with `context.`.
#[must_use]
pub fn extract_metadata(event: &dyn DomainEvent) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    fields.insert("event_id".to_owned(), event.event_id().to_string());
    fields.insert("event_type".to_owned(), event.event_type().to_owned());
    fields.insert("event_version".to_owned(), event.event_version().to_string());
    fields.insert("aggregate_id".to_owned(), event.aggregate_id().to_string());
    fields.insert("aggregate_type".to_owned(), event.aggregate_type().to_owned());
    fields.insert(
        "occurred_at".to_owned(),
        event
            .occurred_at()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    if let Some(correlation_id) = event.correlation_id() {
        fields.insert("correlation_id".to_owned(), correlation_id.to_string());
    }
    if let Some(causation_id) = event.causation_id() {
        fields.insert("causation_id".to_owned(), causation_id.to_string());
    }
    if let Some(context) = event.event_context() {
        fields.insert("source".to_owned(), context.source.clone());
        if let Some(initiated_by) = &context.initiated_by {
            fields.insert("initiated_by".to_owned(), initiated_by.clone());
        }
        for (key, value) in &context.metadata {
            fields.insert(format!("context.{key}"), value.clone());
        }
    }
    fields
}
