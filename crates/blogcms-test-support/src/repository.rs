//! Mock `AggregateRepository` implementations.

use std::marker::PhantomData;

use async_trait::async_trait;
use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::error::DomainError;
use blogcms_core::repository::AggregateRepository;
use uuid::Uuid;

/// A repository that always returns an infrastructure error. Useful for
/// testing that nothing is published when persistence fails.
#[derive(Debug)]
pub struct FailingRepository<A> {
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> FailingRepository<A> {
    /// Creates a failing repository for aggregates of type `A`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _aggregate: PhantomData,
        }
    }
}

impl<A> Default for FailingRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: AggregateRoot + 'static> AggregateRepository<A> for FailingRepository<A> {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<A>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(&self, _aggregate: &A) -> Result<i64, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
