//! Typed entity event envelopes.
//!
//! Every aggregate in the CMS records the same four shapes of event: it was
//! created, updated, deleted, or moved between states. [`EntityEvent`] is
//! the envelope for those shapes, parameterised by the aggregate's snapshot
//! type. The aggregate type name comes from [`EntitySnapshot::AGGREGATE_TYPE`].

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::context::EventContext;
use crate::event::{DomainEvent, EventMetadata};

/// State captured in `Created` and `Updated` payloads.
pub trait EntitySnapshot: Clone + fmt::Debug + Serialize + Send + Sync {
    /// Aggregate family name written to `EventMetadata::aggregate_type`.
    const AGGREGATE_TYPE: &'static str;
}

/// Discriminator for the four entity event shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityEventType {
    /// The aggregate was created.
    Created,
    /// One or more fields of the aggregate changed.
    Updated,
    /// The aggregate was removed.
    Deleted,
    /// The aggregate moved from one state to another.
    StateChanged,
}

impl EntityEventType {
    /// The `event_type` string carried in event metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "EntityCreated",
            Self::Updated => "EntityUpdated",
            Self::Deleted => "EntityDeleted",
            Self::StateChanged => "EntityStateChanged",
        }
    }
}

impl AsRef<str> for EntityEventType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EntityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payload variants shared by all aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityEventKind<S> {
    /// Full snapshot of a newly created aggregate.
    Created {
        /// State right after creation.
        snapshot: S,
    },
    /// Snapshot after a change plus the names of the fields that changed.
    Updated {
        /// State right after the change.
        snapshot: S,
        /// Names of the changed fields.
        changed_fields: BTreeSet<String>,
    },
    /// The aggregate was deleted.
    Deleted {
        /// Why it was deleted, if given.
        reason: Option<String>,
    },
    /// State transition pair.
    StateChanged {
        /// State before the transition.
        from: String,
        /// State after the transition.
        to: String,
    },
}

impl<S> EntityEventKind<S> {
    /// Returns the discriminator for this payload.
    #[must_use]
    pub const fn event_type(&self) -> EntityEventType {
        match self {
            Self::Created { .. } => EntityEventType::Created,
            Self::Updated { .. } => EntityEventType::Updated,
            Self::Deleted { .. } => EntityEventType::Deleted,
            Self::StateChanged { .. } => EntityEventType::StateChanged,
        }
    }
}

/// Domain event envelope for entity lifecycle events.
#[derive(Debug, Clone)]
pub struct EntityEvent<S> {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Circumstances the event was recorded under.
    pub context: EventContext,
    /// Event-specific payload.
    pub kind: EntityEventKind<S>,
}

impl<S: EntitySnapshot> EntityEvent<S> {
    /// Creates a root event about `aggregate_id`, timestamped by `clock`.
    #[must_use]
    pub fn new(
        aggregate_id: Uuid,
        kind: EntityEventKind<S>,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Self {
        let metadata = EventMetadata::new(
            aggregate_id,
            S::AGGREGATE_TYPE,
            kind.event_type().as_str(),
            clock.now(),
        );
        Self {
            metadata,
            context,
            kind,
        }
    }

    /// An `EntityCreated` event.
    #[must_use]
    pub fn created(
        aggregate_id: Uuid,
        snapshot: S,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Self {
        Self::new(
            aggregate_id,
            EntityEventKind::Created { snapshot },
            context,
            clock,
        )
    }

    /// An `EntityUpdated` event.
    #[must_use]
    pub fn updated<I, F>(
        aggregate_id: Uuid,
        snapshot: S,
        changed_fields: I,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self::new(
            aggregate_id,
            EntityEventKind::Updated {
                snapshot,
                changed_fields: changed_fields.into_iter().map(Into::into).collect(),
            },
            context,
            clock,
        )
    }

    /// An `EntityDeleted` event.
    #[must_use]
    pub fn deleted(
        aggregate_id: Uuid,
        reason: Option<String>,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Self {
        Self::new(
            aggregate_id,
            EntityEventKind::Deleted { reason },
            context,
            clock,
        )
    }

    /// An `EntityStateChanged` event.
    #[must_use]
    pub fn state_changed(
        aggregate_id: Uuid,
        from: impl Into<String>,
        to: impl Into<String>,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Self {
        Self::new(
            aggregate_id,
            EntityEventKind::StateChanged {
                from: from.into(),
                to: to.into(),
            },
            context,
            clock,
        )
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.metadata = self.metadata.with_correlation_id(correlation_id);
        self
    }

    /// Links this event to its trigger. Intended for use inside
    /// [`DomainEvent::follow_up`].
    #[must_use]
    pub fn caused_by(mut self, causation_id: Uuid, correlation_id: Option<Uuid>) -> Self {
        self.metadata = self.metadata.caused_by(causation_id, correlation_id);
        self
    }

    /// Replaces the generated event id.
    #[must_use]
    pub fn with_event_id(mut self, event_id: Uuid) -> Self {
        self.metadata = self.metadata.with_event_id(event_id);
        self
    }

    /// Replaces the captured timestamp.
    #[must_use]
    pub fn with_occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.metadata = self.metadata.with_occurred_at(occurred_at);
        self
    }

    /// Sets the payload schema version.
    #[must_use]
    pub fn with_event_version(mut self, event_version: u32) -> Self {
        self.metadata = self.metadata.with_event_version(event_version);
        self
    }

    /// The payload discriminator.
    #[must_use]
    pub fn entity_event_type(&self) -> EntityEventType {
        self.kind.event_type()
    }
}

impl<S: EntitySnapshot> DomainEvent for EntityEvent<S> {
    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_context(&self) -> Option<&EventContext> {
        Some(&self.context)
    }

    fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.kind)
    }
}

impl<S> PartialEq for EntityEvent<S> {
    fn eq(&self, other: &Self) -> bool {
        self.metadata.event_id == other.metadata.event_id
    }
}

impl<S> Eq for EntityEvent<S> {}

impl<S> Hash for EntityEvent<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.metadata.event_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Debug, Clone, Serialize)]
    struct NoteSnapshot {
        title: String,
    }

    impl EntitySnapshot for NoteSnapshot {
        const AGGREGATE_TYPE: &'static str = "Note";
    }

    type NoteEvent = EntityEvent<NoteSnapshot>;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn context() -> EventContext {
        EventContext::new("test.notes")
    }

    fn note(title: &str) -> NoteSnapshot {
        NoteSnapshot {
            title: title.to_owned(),
        }
    }

    #[test]
    fn test_created_event_carries_explicit_aggregate_type_and_event_type() {
        // Arrange
        let aggregate_id = Uuid::new_v4();

        // Act
        let event = NoteEvent::created(aggregate_id, note("hello"), context(), &clock());

        // Assert
        assert_eq!(event.aggregate_type(), "Note");
        assert_eq!(event.event_type(), "EntityCreated");
        assert_eq!(event.entity_event_type(), EntityEventType::Created);
        assert_eq!(event.aggregate_id(), aggregate_id);
        assert_eq!(event.event_version(), 1);
        assert_eq!(event.occurred_at(), clock().0);
        assert_eq!(event.event_context(), Some(&context()));
        assert!(event.causation_id().is_none());
    }

    #[test]
    fn test_each_constructor_maps_to_its_event_type() {
        let id = Uuid::new_v4();
        let c = clock();

        assert_eq!(
            NoteEvent::updated(id, note("x"), ["title"], context(), &c).event_type(),
            "EntityUpdated"
        );
        assert_eq!(
            NoteEvent::deleted(id, None, context(), &c).event_type(),
            "EntityDeleted"
        );
        assert_eq!(
            NoteEvent::state_changed(id, "DRAFT", "PUBLISHED", context(), &c).event_type(),
            "EntityStateChanged"
        );
    }

    #[test]
    fn test_payload_serializes_tagged_variant() {
        // Arrange
        let event = NoteEvent::updated(
            Uuid::new_v4(),
            note("new"),
            ["title", "body"],
            context(),
            &clock(),
        );

        // Act
        let payload = event.to_payload().unwrap();

        // Assert
        assert_eq!(
            payload,
            json!({
                "kind": "updated",
                "snapshot": { "title": "new" },
                "changed_fields": ["body", "title"],
            })
        );
    }

    #[test]
    fn test_equality_is_by_event_id_only() {
        // Arrange
        let id = Uuid::new_v4();
        let first = NoteEvent::created(id, note("a"), context(), &clock());
        let second = NoteEvent::created(id, note("a"), context(), &clock());
        let same_id = NoteEvent::deleted(Uuid::new_v4(), None, context(), &clock())
            .with_event_id(first.event_id());

        // Assert
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
        assert_eq!(first, same_id);
    }

    #[test]
    fn test_follow_up_chain_preserves_correlation_and_links_causation() {
        // Arrange
        let id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let c = clock();
        let e1 =
            NoteEvent::created(id, note("a"), context(), &c).with_correlation_id(correlation_id);

        // Act
        let e2 = e1.follow_up(|causation_id, correlation_id| {
            NoteEvent::state_changed(id, "DRAFT", "PUBLISHED", context(), &c)
                .caused_by(causation_id, correlation_id)
        });
        let e3 = e2.follow_up(|causation_id, correlation_id| {
            NoteEvent::updated(id, note("b"), ["title"], context(), &c)
                .caused_by(causation_id, correlation_id)
        });

        // Assert
        assert!(e1.causation_id().is_none());
        assert_eq!(e2.causation_id(), Some(e1.event_id()));
        assert_eq!(e3.causation_id(), Some(e2.event_id()));
        assert_eq!(e1.correlation_id(), Some(correlation_id));
        assert_eq!(e2.correlation_id(), Some(correlation_id));
        assert_eq!(e3.correlation_id(), Some(correlation_id));
        assert_ne!(e2.causation_id(), Some(e2.event_id()));
    }

    #[test]
    fn test_follow_up_may_assign_correlation_when_trigger_has_none() {
        // Arrange
        let id = Uuid::new_v4();
        let c = clock();
        let trigger = NoteEvent::created(id, note("a"), context(), &c);
        let assigned = Uuid::new_v4();

        // Act
        let follow = trigger.follow_up(|causation_id, correlation_id| {
            NoteEvent::deleted(id, None, context(), &c)
                .caused_by(causation_id, correlation_id.or(Some(assigned)))
        });

        // Assert
        assert_eq!(follow.causation_id(), Some(trigger.event_id()));
        assert_eq!(follow.correlation_id(), Some(assigned));
    }
}
