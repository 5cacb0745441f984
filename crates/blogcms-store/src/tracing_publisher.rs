//! Publisher that writes drained domain events to the tracing pipeline.

use async_trait::async_trait;
use tracing::info;

use blogcms_core::error::DomainError;
use blogcms_core::event::DomainEvent;
use blogcms_core::publisher::DomainEventPublisher;
use blogcms_core::record::EventRecord;

/// Emits one structured `info` event per published domain event, with the
/// serialized [`EventRecord`] as the `record` field.
#[derive(Debug, Clone, Default)]
pub struct TracingEventPublisher {
    target_source: Option<String>,
}

impl TracingEventPublisher {
    /// Creates a publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags every log line with the publishing application's name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.target_source = Some(source.into());
        self
    }

    /// Renders the JSON line logged for `event`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Publish` if the event cannot be serialized.
    pub fn render(event: &dyn DomainEvent) -> Result<String, DomainError> {
        EventRecord::from_event(event)
            .and_then(|record| serde_json::to_string(&record))
            .map_err(|e| DomainError::Publish {
                event_id: event.event_id(),
                reason: format!("event serialization failed: {e}"),
            })
    }
}

#[async_trait]
impl DomainEventPublisher for TracingEventPublisher {
    async fn publish(&self, event: &dyn DomainEvent) -> Result<(), DomainError> {
        let record = Self::render(event)?;
        info!(
            publisher = self.target_source.as_deref().unwrap_or("blogcms"),
            event_id = %event.event_id(),
            event_type = event.event_type(),
            aggregate_type = event.aggregate_type(),
            record = %record,
            "domain event published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use blogcms_core::context::EventContext;
    use blogcms_core::entity_event::{EntityEvent, EntitySnapshot};
    use blogcms_test_support::FixedClock;
    use serde::Serialize;
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Clone, Serialize)]
    struct LabelSnapshot {
        name: String,
    }

    impl EntitySnapshot for LabelSnapshot {
        const AGGREGATE_TYPE: &'static str = "Label";
    }

    #[derive(Debug, Clone, Serialize)]
    struct BadSnapshot {
        by_parts: BTreeMap<Vec<u8>, u8>,
    }

    impl EntitySnapshot for BadSnapshot {
        const AGGREGATE_TYPE: &'static str = "Bad";
    }

    #[tokio::test]
    async fn test_publish_succeeds_for_serializable_event() {
        let event = EntityEvent::created(
            Uuid::new_v4(),
            LabelSnapshot {
                name: "rust".to_owned(),
            },
            EventContext::new("test.labels"),
            &FixedClock::default(),
        );

        let result = TracingEventPublisher::new()
            .with_source("tests")
            .publish(&event)
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_render_produces_record_json() {
        let event = EntityEvent::created(
            Uuid::new_v4(),
            LabelSnapshot {
                name: "rust".to_owned(),
            },
            EventContext::new("test.labels"),
            &FixedClock::default(),
        );

        let line = TracingEventPublisher::render(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["aggregate_type"], "Label");
        assert_eq!(value["payload"]["snapshot"]["name"], "rust");
    }

    #[tokio::test]
    async fn test_unserializable_payload_is_a_publish_error() {
        let mut by_parts = BTreeMap::new();
        by_parts.insert(vec![1, 2], 1);
        let event = EntityEvent::created(
            Uuid::new_v4(),
            BadSnapshot { by_parts },
            EventContext::new("test.bad"),
            &FixedClock::default(),
        );

        let result = TracingEventPublisher::new().publish(&event).await;

        assert!(matches!(result, Err(DomainError::Publish { .. })));
    }
}
