//! Aggregate repository abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;

/// Repository port for loading and storing aggregates of one type.
///
/// Implementations persist aggregate state only. Pending domain events are
/// never stored; draining them is the job of
/// [`crate::persistence::save_and_publish`] or
/// [`crate::unit_of_work::UnitOfWork::save_and_collect`].
#[async_trait]
pub trait AggregateRepository<A: AggregateRoot>: Send + Sync {
    /// Loads an aggregate by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backing store fails.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, DomainError>;

    /// Stores the aggregate with optimistic concurrency on its version and
    /// returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ConcurrencyConflict` if the stored version does
    /// not match `aggregate.version()`, or `DomainError::Infrastructure` if the
    /// backing store fails.
    async fn save(&self, aggregate: &A) -> Result<i64, DomainError>;

    /// Removes an aggregate. Removing a missing aggregate is not an error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the backing store fails.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
