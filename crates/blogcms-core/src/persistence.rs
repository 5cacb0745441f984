//! Post-persistence hook: save, then drain and publish.
//!
//! On this path the drain happens by move right after a successful save and
//! every drained event goes straight to the publisher, so pending events
//! cannot be cleared without being published.

use tracing::{debug, error, warn};

use crate::aggregate::AggregateRoot;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::publisher::DomainEventPublisher;
use crate::repository::AggregateRepository;

/// Saves `aggregate`, then drains its pending events and publishes each one
/// exactly once. Returns the number of events handed to the publisher.
///
/// `updated_at` is stamped before the save and restored if the save fails.
/// A failed save publishes nothing and leaves the pending events in place.
///
/// # Errors
///
/// Returns the repository error if the save fails. If one or more events fail
/// to publish, every event is still attempted and the first publish error is
/// returned; the buffer has already been drained at that point.
pub async fn save_and_publish<A, R>(
    aggregate: &mut A,
    repo: &R,
    publisher: &dyn DomainEventPublisher,
    clock: &dyn Clock,
) -> Result<usize, DomainError>
where
    A: AggregateRoot,
    R: AggregateRepository<A> + ?Sized,
{
    save_stamped(aggregate, repo, clock).await?;

    let events = aggregate.take_domain_events();
    let refs: Vec<&dyn DomainEvent> = events.iter().map(|e| e as &dyn DomainEvent).collect();
    publish_all(publisher, &refs).await
}

/// Removes `aggregate` from the repository, then drains and publishes its
/// pending events (typically the `EntityDeleted` it just recorded).
///
/// # Errors
///
/// Returns the repository error if removal fails, in which case nothing is
/// published and the pending events stay in place. Publish failures are
/// reported like [`save_and_publish`].
pub async fn delete_and_publish<A, R>(
    aggregate: &mut A,
    repo: &R,
    publisher: &dyn DomainEventPublisher,
) -> Result<usize, DomainError>
where
    A: AggregateRoot,
    R: AggregateRepository<A> + ?Sized,
{
    let aggregate_id = aggregate.aggregate_id();
    if let Err(err) = repo.delete(aggregate_id).await {
        warn!(%aggregate_id, error = %err, "delete failed; pending events kept");
        return Err(err);
    }

    let events = aggregate.take_domain_events();
    let refs: Vec<&dyn DomainEvent> = events.iter().map(|e| e as &dyn DomainEvent).collect();
    publish_all(publisher, &refs).await
}

/// Stamps `updated_at`, saves, and records the new version. Restores the
/// previous timestamps if the save fails.
pub(crate) async fn save_stamped<A, R>(
    aggregate: &mut A,
    repo: &R,
    clock: &dyn Clock,
) -> Result<(), DomainError>
where
    A: AggregateRoot,
    R: AggregateRepository<A> + ?Sized,
{
    let aggregate_id = aggregate.aggregate_id();
    let previous = *aggregate.timestamps();
    aggregate.base_mut().timestamps_mut().touch(clock.now());

    match repo.save(aggregate).await {
        Ok(version) => {
            aggregate.base_mut().set_version(version);
            Ok(())
        }
        Err(err) => {
            *aggregate.base_mut().timestamps_mut() = previous;
            warn!(%aggregate_id, error = %err, "save failed; pending events kept");
            Err(err)
        }
    }
}

/// Publishes every event in order and reports the first failure.
pub(crate) async fn publish_all(
    publisher: &dyn DomainEventPublisher,
    events: &[&dyn DomainEvent],
) -> Result<usize, DomainError> {
    let mut first_error = None;
    for event in events {
        debug!(
            event_id = %event.event_id(),
            event_type = event.event_type(),
            aggregate_type = event.aggregate_type(),
            aggregate_id = %event.aggregate_id(),
            "publishing domain event"
        );
        if let Err(err) = publisher.publish(*event).await {
            error!(event_id = %event.event_id(), error = %err, "domain event publish failed");
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(events.len()),
    }
}
