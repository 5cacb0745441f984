//! In-memory implementation of the `AggregateRepository` trait.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::error::DomainError;
use blogcms_core::repository::AggregateRepository;

/// Process-local aggregate repository.
///
/// Stores a copy of each aggregate without its pending events and enforces
/// optimistic concurrency on the aggregate version.
#[derive(Debug)]
pub struct InMemoryRepository<A> {
    aggregates: RwLock<HashMap<Uuid, A>>,
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            aggregates: RwLock::new(HashMap::new()),
        }
    }
}

impl<A: AggregateRoot + Clone> InMemoryRepository<A> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored aggregates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }

    /// Whether the repository holds no aggregates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.read()?.is_empty())
    }

    /// Copies of every stored aggregate accepted by `filter`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn find_all<F>(&self, filter: F) -> Result<Vec<A>, DomainError>
    where
        F: Fn(&A) -> bool,
    {
        Ok(self
            .read()?
            .values()
            .filter(|aggregate| filter(aggregate))
            .cloned()
            .collect())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, A>>, DomainError> {
        self.aggregates
            .read()
            .map_err(|_| DomainError::Infrastructure("repository lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, A>>, DomainError> {
        self.aggregates
            .write()
            .map_err(|_| DomainError::Infrastructure("repository lock poisoned".into()))
    }
}

#[async_trait]
impl<A> AggregateRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<A>, DomainError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn save(&self, aggregate: &A) -> Result<i64, DomainError> {
        let aggregate_id = aggregate.aggregate_id();
        let mut aggregates = self.write()?;

        let stored_version = aggregates.get(&aggregate_id).map_or(0, AggregateRoot::version);
        if stored_version != aggregate.version() {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: aggregate.version(),
                actual: stored_version,
            });
        }

        let new_version = stored_version + 1;
        let mut stored = aggregate.clone();
        stored.clear_domain_events();
        stored.base_mut().set_version(new_version);
        aggregates.insert(aggregate_id, stored);

        debug!(%aggregate_id, version = new_version, "aggregate saved");
        Ok(new_version)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.write()?.remove(&id).is_some() {
            debug!(aggregate_id = %id, "aggregate removed");
        }
        Ok(())
    }
}
