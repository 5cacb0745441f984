//! Aggregate root abstraction.
//!
//! An aggregate owns an ordered buffer of pending domain events. Business
//! methods append to it; the persistence side drains it after a successful
//! save. The buffer is exclusively owned by one aggregate instance and is not
//! meant to be shared across threads while being mutated.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::event::DomainEvent;
use crate::lifecycle::{LifecycleState, Timestamps};

/// Ordered, append-only buffer of pending domain events.
///
/// The buffer never deduplicates and has no capacity limit.
#[derive(Debug, Clone)]
pub struct DomainEvents<E> {
    events: Vec<E>,
}

impl<E> Default for DomainEvents<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> DomainEvents<E> {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one event at the end.
    pub fn push(&mut self, event: E) {
        self.events.push(event);
    }

    /// Appends all events in iteration order.
    pub fn extend<I: IntoIterator<Item = E>>(&mut self, events: I) {
        self.events.extend(events);
    }

    /// Empties the buffer. Clearing an empty buffer is a no-op.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Removes and returns every buffered event, oldest first.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    /// Whether no events are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<E: Clone> DomainEvents<E> {
    /// Returns an owned, immutable copy of the buffer.
    ///
    /// Later changes to the buffer are not visible through the snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[E]> {
        Arc::from(self.events.as_slice())
    }
}

impl<E: DomainEvent + Clone> DomainEvents<E> {
    /// Counts buffered events whose `event_type` equals `event_type`.
    #[must_use]
    pub fn count_of_type(&self, event_type: &str) -> usize {
        self.events
            .iter()
            .filter(|event| event.is_event_type(event_type))
            .count()
    }

    /// Copies of buffered events whose `event_type` equals `event_type`.
    #[must_use]
    pub fn of_type(&self, event_type: &str) -> Vec<E> {
        self.events
            .iter()
            .filter(|event| event.is_event_type(event_type))
            .cloned()
            .collect()
    }
}

/// State every aggregate root carries: identity, optimistic-concurrency
/// version, lifecycle timestamps and pending events.
#[derive(Debug, Clone)]
pub struct AggregateBase<E> {
    id: Uuid,
    version: i64,
    timestamps: Timestamps,
    events: DomainEvents<E>,
}

impl<E> AggregateBase<E> {
    /// A new, never-persisted aggregate base created at `now`.
    #[must_use]
    pub fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            version: 0,
            timestamps: Timestamps::new(now),
            events: DomainEvents::new(),
        }
    }

    /// Aggregate identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of successful saves.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Sets the version after a save.
    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    /// Lifecycle timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    /// Mutable lifecycle timestamps.
    pub fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    /// The pending event buffer.
    #[must_use]
    pub fn events(&self) -> &DomainEvents<E> {
        &self.events
    }

    /// The pending event buffer, mutably. Only the provided
    /// [`AggregateRoot`] methods reach it.
    pub(crate) fn events_mut(&mut self) -> &mut DomainEvents<E> {
        &mut self.events
    }
}

/// Trait for aggregate roots that record domain events.
///
/// Implementors only expose their [`AggregateBase`]; every event operation is
/// provided. The only way to mutate the pending events is through the
/// `add_*`, `clear_*` and `take_*` methods.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate records.
    type Event: DomainEvent + Clone;

    /// Returns the shared aggregate state.
    fn base(&self) -> &AggregateBase<Self::Event>;

    /// Returns the shared aggregate state, mutably.
    ///
    /// For implementors and the persistence side (version and timestamp
    /// bookkeeping). The pending event buffer is not reachable through it;
    /// use the `add_*`, `clear_*` and `take_*` methods.
    fn base_mut(&mut self) -> &mut AggregateBase<Self::Event>;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid {
        self.base().id()
    }

    /// Returns the current version (number of successful saves).
    fn version(&self) -> i64 {
        self.base().version()
    }

    /// Returns the lifecycle timestamps.
    fn timestamps(&self) -> &Timestamps {
        self.base().timestamps()
    }

    /// Whether the aggregate has never been persisted.
    fn is_new(&self) -> bool {
        self.timestamps().is_new()
    }

    /// Derived lifecycle classification relative to `now`.
    fn lifecycle_state(&self, now: DateTime<Utc>, recency_threshold: Duration) -> LifecycleState {
        self.timestamps().classify(now, recency_threshold)
    }

    /// Owned, read-only snapshot of the pending events, oldest first.
    fn domain_events(&self) -> Arc<[Self::Event]> {
        self.base().events().snapshot()
    }

    /// Appends an event. The same event may be added more than once.
    fn add_domain_event(&mut self, event: Self::Event) {
        self.base_mut().events_mut().push(event);
    }

    /// Appends all events, preserving order.
    fn add_domain_events<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = Self::Event>,
    {
        self.base_mut().events_mut().extend(events);
    }

    /// Empties the pending events. Idempotent.
    ///
    /// Events cleared before they were handed to a publisher are lost; prefer
    /// [`AggregateRoot::take_domain_events`] or
    /// [`crate::persistence::save_and_publish`].
    fn clear_domain_events(&mut self) {
        self.base_mut().events_mut().clear();
    }

    /// Drains the pending events, oldest first.
    fn take_domain_events(&mut self) -> Vec<Self::Event> {
        self.base_mut().events_mut().take()
    }

    /// Whether any events are pending.
    fn has_domain_events(&self) -> bool {
        !self.base().events().is_empty()
    }

    /// Counts pending events of the given `event_type`.
    fn count_domain_events_of_type(&self, event_type: impl AsRef<str>) -> usize
    where
        Self: Sized,
    {
        self.base().events().count_of_type(event_type.as_ref())
    }

    /// Pending events of the given `event_type`, oldest first.
    fn domain_events_of_type(&self, event_type: impl AsRef<str>) -> Vec<Self::Event>
    where
        Self: Sized,
    {
        self.base().events().of_type(event_type.as_ref())
    }

    /// Whether at least one pending event has the given `event_type`.
    fn has_domain_event_of_type(&self, event_type: impl AsRef<str>) -> bool
    where
        Self: Sized,
    {
        self.count_domain_events_of_type(event_type) > 0
    }
}
