//! Outbound port for handing drained events to a transport.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::DomainEvent;

/// Publishes a single drained domain event to an external transport
/// (message broker, outbox table, log).
///
/// Retry and delivery guarantees belong to the implementation.
#[async_trait]
pub trait DomainEventPublisher: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Publish` if the transport rejects the event.
    async fn publish(&self, event: &dyn DomainEvent) -> Result<(), DomainError>;
}
