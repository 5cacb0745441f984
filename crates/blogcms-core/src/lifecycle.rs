//! Aggregate lifecycle timestamps.
//!
//! These are entity-level metadata, independent of domain events. The
//! [`LifecycleState`] is derived from timestamps on demand and never gates
//! which business methods may run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Derived classification of an aggregate's persistence lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Never persisted (`updated_at` is unset).
    New,
    /// Persisted and not touched within the recency threshold.
    Stable,
    /// Persisted and touched within the recency threshold.
    RecentlyUpdated,
}

/// Creation and last-persisted timestamps of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// When the aggregate was created in memory.
    pub created_at: DateTime<Utc>,
    /// When the aggregate was last persisted. `None` means new.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Timestamps {
    /// Timestamps for an aggregate created at `now` and not yet persisted.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: None,
        }
    }

    /// Whether the aggregate has never been persisted.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.updated_at.is_none()
    }

    /// Time elapsed since creation.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Records a persistence at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    /// Classifies the aggregate relative to `now`.
    ///
    /// An update exactly `threshold` ago still counts as recent.
    #[must_use]
    pub fn classify(&self, now: DateTime<Utc>, threshold: Duration) -> LifecycleState {
        match self.updated_at {
            None => LifecycleState::New,
            Some(updated_at) if now - updated_at <= threshold => LifecycleState::RecentlyUpdated,
            Some(_) => LifecycleState::Stable,
        }
    }
}
