//! Shared application state.

use std::sync::Arc;

use blogcms_core::clock::{Clock, SystemClock};
use blogcms_core::publisher::DomainEventPublisher;
use blogcms_media::domain::aggregates::MediaFile;
use blogcms_member::domain::aggregates::Member;
use blogcms_post::domain::aggregates::Post;
use blogcms_store::{InMemoryRepository, TracingEventPublisher};
use blogcms_user::domain::aggregates::User;

use crate::config::AppConfig;

/// Repositories, clock, and publisher shared by every command and query.
#[derive(Clone)]
pub struct AppState {
    /// Loaded process configuration.
    pub config: AppConfig,
    /// Time source for every command.
    pub clock: Arc<dyn Clock>,
    /// Destination of committed domain events.
    pub publisher: Arc<dyn DomainEventPublisher>,
    /// Post store.
    pub posts: Arc<InMemoryRepository<Post>>,
    /// Member store.
    pub members: Arc<InMemoryRepository<Member>>,
    /// Media file store.
    pub media: Arc<InMemoryRepository<MediaFile>>,
    /// User account store.
    pub users: Arc<InMemoryRepository<User>>,
}

impl AppState {
    /// Production wiring: system clock and a tracing publisher tagged with
    /// the configured event source.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let publisher = TracingEventPublisher::new().with_source(config.event_source.clone());
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(publisher))
    }

    /// Wiring with an explicit clock and publisher.
    #[must_use]
    pub fn with_parts(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn DomainEventPublisher>,
    ) -> Self {
        Self {
            config,
            clock,
            publisher,
            posts: Arc::new(InMemoryRepository::new()),
            members: Arc::new(InMemoryRepository::new()),
            media: Arc::new(InMemoryRepository::new()),
            users: Arc::new(InMemoryRepository::new()),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
