//! Per-unit-of-work event collection point.
//!
//! A [`UnitOfWork`] is created per request or transaction and passed
//! explicitly through the command handlers that take part in it. Each
//! handler saves its aggregates through the unit of work, which drains their
//! pending events into one ordered collection. The caller then commits the
//! unit of work, publishing everything recorded exactly once.
//!
//! Events are collected only after their aggregate was stored, so a unit of
//! work abandoned after a later failure still owes those events to the
//! publisher. [`UnitOfWork::commit_with`] publishes them before handing the
//! failure back; dropping a non-empty unit of work logs a warning.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::aggregate::AggregateRoot;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::persistence::{publish_all, save_stamped};
use crate::publisher::DomainEventPublisher;
use crate::repository::AggregateRepository;

/// Collects domain events from every aggregate touched in one unit of work.
///
/// Not meant to be shared between concurrent requests; each request owns its
/// own instance.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a single event.
    pub fn record<E: DomainEvent + 'static>(&mut self, event: E) {
        self.events.push(Arc::new(event));
    }

    /// Drains the aggregate's pending events into this unit of work and
    /// returns how many were moved.
    pub fn collect_from<A>(&mut self, aggregate: &mut A) -> usize
    where
        A: AggregateRoot,
        A::Event: 'static,
    {
        let drained = aggregate.take_domain_events();
        let count = drained.len();
        self.events.extend(
            drained
                .into_iter()
                .map(|event| Arc::new(event) as Arc<dyn DomainEvent>),
        );
        count
    }

    /// Saves the aggregate and, only if the save succeeded, drains its
    /// pending events into this unit of work.
    ///
    /// # Errors
    ///
    /// Returns the repository error; the aggregate keeps its pending events.
    pub async fn save_and_collect<A, R>(
        &mut self,
        aggregate: &mut A,
        repo: &R,
        clock: &dyn Clock,
    ) -> Result<usize, DomainError>
    where
        A: AggregateRoot,
        A::Event: 'static,
        R: AggregateRepository<A> + ?Sized,
    {
        save_stamped(aggregate, repo, clock).await?;
        let collected = self.collect_from(aggregate);
        debug!(
            aggregate_id = %aggregate.aggregate_id(),
            collected,
            pending = self.events.len(),
            "collected domain events"
        );
        Ok(collected)
    }

    /// Number of collected, not yet drained events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is waiting to be drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Read-only view of the collected events in recording order.
    #[must_use]
    pub fn pending(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    /// Returns every collected event and empties the collector. A second
    /// call before new events are recorded returns an empty vector.
    pub fn get_domain_events_and_clear(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }

    /// Drains the collector and publishes every event once, in recording
    /// order. Returns the number of events handed to the publisher.
    ///
    /// # Errors
    ///
    /// Every event is attempted; the first publish error is returned.
    pub async fn commit(&mut self, publisher: &dyn DomainEventPublisher) -> Result<usize, DomainError> {
        let events = self.get_domain_events_and_clear();
        let refs: Vec<&dyn DomainEvent> = events.iter().map(|event| &**event).collect();
        publish_all(publisher, &refs).await
    }

    /// Commits whatever was collected, then returns `outcome` together with
    /// the number of published events.
    ///
    /// Use this when the work that filled the unit of work may have failed
    /// part-way: aggregates saved before the failure are already stored, so
    /// their events are still published.
    ///
    /// # Errors
    ///
    /// Returns the error from `outcome` if it failed, otherwise the first
    /// publish error.
    pub async fn commit_with<T>(
        &mut self,
        publisher: &dyn DomainEventPublisher,
        outcome: Result<T, DomainError>,
    ) -> Result<(T, usize), DomainError> {
        let published = self.commit(publisher).await;
        match outcome {
            Ok(value) => Ok((value, published?)),
            Err(err) => {
                match published {
                    Ok(count) => warn!(
                        published = count,
                        error = %err,
                        "published events of stored aggregates after a failed unit of work"
                    ),
                    Err(publish_err) => warn!(
                        error = %err,
                        publish_error = %publish_err,
                        "failed to publish events of stored aggregates after a failed unit of work"
                    ),
                }
                Err(err)
            }
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if !self.events.is_empty() {
            warn!(
                pending = self.events.len(),
                "unit of work dropped with unpublished events"
            );
        }
    }
}
