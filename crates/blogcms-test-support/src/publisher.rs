//! Mock `DomainEventPublisher` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use blogcms_core::error::DomainError;
use blogcms_core::event::DomainEvent;
use blogcms_core::publisher::DomainEventPublisher;
use blogcms_core::record::EventRecord;

/// A publisher that records every published event as an [`EventRecord`].
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<EventRecord>>,
}

impl RecordingEventPublisher {
    /// Creates an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything published so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<EventRecord> {
        self.published.lock().unwrap().clone()
    }

    /// Event types published so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published_types(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.event_type.clone())
            .collect()
    }
}

#[async_trait]
impl DomainEventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: &dyn DomainEvent) -> Result<(), DomainError> {
        let record = EventRecord::from_event(event).map_err(|e| DomainError::Publish {
            event_id: event.event_id(),
            reason: e.to_string(),
        })?;
        self.published.lock().unwrap().push(record);
        Ok(())
    }
}

/// A publisher that rejects every event. Useful for testing publish-failure
/// paths.
#[derive(Debug)]
pub struct FailingEventPublisher;

#[async_trait]
impl DomainEventPublisher for FailingEventPublisher {
    async fn publish(&self, event: &dyn DomainEvent) -> Result<(), DomainError> {
        Err(DomainError::Publish {
            event_id: event.event_id(),
            reason: "broker unavailable".into(),
        })
    }
}
