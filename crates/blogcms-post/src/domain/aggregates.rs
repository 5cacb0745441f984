//! Aggregate roots for the Post context.

use std::fmt;

use blogcms_core::aggregate::{AggregateBase, AggregateRoot};
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::entity_event::EntitySnapshot;
use blogcms_core::error::DomainError;
use blogcms_core::event::DomainEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::events::{PostEvent, PostSnapshot, fields};

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Editorial status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    /// Being written; not visible to readers.
    Draft,
    /// Visible to readers.
    Published,
    /// Withdrawn from listings; read-only.
    Archived,
}

impl PostStatus {
    /// The name used in state-transition events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives a URL slug: lowercase ASCII letters and digits separated by
/// single hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("post title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::Validation(format!(
            "post title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    if slugify(title).is_empty() {
        return Err(DomainError::Validation(
            "post title must contain at least one letter or digit".into(),
        ));
    }
    Ok(title.to_owned())
}

/// The aggregate root for a blog post.
#[derive(Debug, Clone)]
pub struct Post {
    base: AggregateBase<PostEvent>,
    author_id: Uuid,
    title: String,
    slug: String,
    content: String,
    status: PostStatus,
    published_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Creates a draft post, recording an `EntityCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the title is empty, too long, or
    /// has no letters or digits.
    pub fn create(
        id: Uuid,
        author_id: Uuid,
        title: &str,
        content: &str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title)?;
        let mut post = Self {
            base: AggregateBase::new(id, clock.now()),
            author_id,
            slug: slugify(&title),
            title,
            content: content.to_owned(),
            status: PostStatus::Draft,
            published_at: None,
        };

        let event = PostEvent::created(id, post.snapshot(), context, clock)
            .with_correlation_id(correlation_id);
        post.add_domain_event(event);
        Ok(post)
    }

    /// The author's member id.
    #[must_use]
    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    /// Post title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// URL slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Post body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Editorial status.
    #[must_use]
    pub fn status(&self) -> PostStatus {
        self.status
    }

    /// First publication timestamp.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Current state as an event payload.
    #[must_use]
    pub fn snapshot(&self) -> PostSnapshot {
        PostSnapshot {
            post_id: self.aggregate_id(),
            author_id: self.author_id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            content: self.content.clone(),
            status: self.status,
            published_at: self.published_at,
        }
    }

    /// Changes title and/or content. Records an `EntityUpdated` event listing
    /// the changed fields, or nothing if no value actually changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the post is archived or the new
    /// title is invalid.
    pub fn update_content(
        &mut self,
        title: Option<&str>,
        content: Option<&str>,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.status == PostStatus::Archived {
            return Err(DomainError::Validation(format!(
                "post {} is archived and cannot be edited",
                self.aggregate_id()
            )));
        }

        let mut changed = Vec::new();
        if let Some(title) = title {
            let title = validate_title(title)?;
            if title != self.title {
                let slug = slugify(&title);
                if slug != self.slug {
                    self.slug = slug;
                    changed.push(fields::SLUG);
                }
                self.title = title;
                changed.push(fields::TITLE);
            }
        }
        if let Some(content) = content {
            if content != self.content {
                content.clone_into(&mut self.content);
                changed.push(fields::CONTENT);
            }
        }
        if changed.is_empty() {
            return Ok(());
        }

        let event = PostEvent::updated(self.aggregate_id(), self.snapshot(), changed, context, clock)
            .with_correlation_id(correlation_id);
        self.add_domain_event(event);
        Ok(())
    }

    /// Publishes a draft. Records `EntityStateChanged` (DRAFT → PUBLISHED)
    /// followed by an `EntityUpdated` for `published_at` caused by it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the post is a
    /// draft.
    pub fn publish(
        &mut self,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.status != PostStatus::Draft {
            return Err(self.transition_error(PostStatus::Published));
        }
        let from = self.status;
        self.status = PostStatus::Published;
        self.published_at = Some(clock.now());

        let id = self.aggregate_id();
        let state_changed = PostEvent::state_changed(
            id,
            from.as_str(),
            PostStatus::Published.as_str(),
            context.clone(),
            clock,
        )
        .with_correlation_id(correlation_id);
        let stamped = state_changed.follow_up(|causation_id, correlation_id| {
            PostEvent::updated(id, self.snapshot(), [fields::PUBLISHED_AT], context, clock)
                .caused_by(causation_id, correlation_id)
        });
        self.add_domain_events([state_changed, stamped]);
        Ok(())
    }

    /// Archives a draft or published post.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if already archived.
    pub fn archive(
        &mut self,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.status == PostStatus::Archived {
            return Err(self.transition_error(PostStatus::Archived));
        }
        let from = self.status;
        self.status = PostStatus::Archived;

        let event = PostEvent::state_changed(
            self.aggregate_id(),
            from.as_str(),
            PostStatus::Archived.as_str(),
            context,
            clock,
        )
        .with_correlation_id(correlation_id);
        self.add_domain_event(event);
        Ok(())
    }

    /// Records an `EntityDeleted` event. Removing the post from storage is
    /// the caller's job.
    pub fn delete(
        &mut self,
        reason: Option<String>,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) {
        let event = PostEvent::deleted(self.aggregate_id(), reason, context, clock)
            .with_correlation_id(correlation_id);
        self.add_domain_event(event);
    }

    fn transition_error(&self, to: PostStatus) -> DomainError {
        DomainError::InvalidStateTransition {
            aggregate_type: PostSnapshot::AGGREGATE_TYPE,
            aggregate_id: self.aggregate_id(),
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}

impl AggregateRoot for Post {
    type Event = PostEvent;

    fn base(&self) -> &AggregateBase<PostEvent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase<PostEvent> {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogcms_core::entity_event::{EntityEventKind, EntityEventType};
    use blogcms_core::validation::validate_event;
    use blogcms_test_support::FixedClock;

    fn context() -> EventContext {
        EventContext::new("blog.post").with_initiator("alice")
    }

    fn draft(correlation_id: Uuid) -> Post {
        Post::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Hello, Rust World!",
            "first body",
            correlation_id,
            context(),
            &FixedClock::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_records_created_event_with_snapshot() {
        // Arrange
        let correlation_id = Uuid::new_v4();

        // Act
        let post = draft(correlation_id);

        // Assert
        assert_eq!(post.slug(), "hello-rust-world");
        assert_eq!(post.status(), PostStatus::Draft);
        assert!(post.is_new());

        let events = post.domain_events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.event_type(), EntityEventType::Created.as_str());
        assert_eq!(event.aggregate_type(), "Post");
        assert_eq!(event.aggregate_id(), post.aggregate_id());
        assert_eq!(event.correlation_id(), Some(correlation_id));
        assert!(event.causation_id().is_none());
        assert!(validate_event(event).is_empty());
        match &event.kind {
            EntityEventKind::Created { snapshot } => assert_eq!(snapshot, &post.snapshot()),
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn test_create_rejects_blank_or_symbol_only_title() {
        let clock = FixedClock::default();
        for title in ["", "   ", "!!!"] {
            let result = Post::create(
                Uuid::new_v4(),
                Uuid::new_v4(),
                title,
                "",
                Uuid::new_v4(),
                context(),
                &clock,
            );
            assert!(matches!(result, Err(DomainError::Validation(_))), "{title:?}");
        }
    }

    #[test]
    fn test_create_rejects_overlong_title() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);

        let result = Post::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            &title,
            "",
            Uuid::new_v4(),
            context(),
            &FixedClock::default(),
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_update_content_reports_changed_fields() {
        // Arrange
        let mut post = draft(Uuid::new_v4());
        post.clear_domain_events();

        // Act
        post.update_content(
            Some("A new title"),
            Some("first body"),
            Uuid::new_v4(),
            context(),
            &FixedClock::default(),
        )
        .unwrap();

        // Assert
        assert_eq!(post.title(), "A new title");
        assert_eq!(post.slug(), "a-new-title");
        let events = post.domain_events();
        assert_eq!(events.len(), 1);
        match &events[0].kind {
            EntityEventKind::Updated {
                changed_fields,
                snapshot,
            } => {
                let names: Vec<&str> = changed_fields.iter().map(String::as_str).collect();
                assert_eq!(names, vec!["slug", "title"]);
                assert_eq!(snapshot.title, "A new title");
            }
            other => panic!("expected Updated, got {other:?}"),
        }
    }

    #[test]
    fn test_update_content_without_changes_records_nothing() {
        let mut post = draft(Uuid::new_v4());
        post.clear_domain_events();

        post.update_content(
            Some("Hello, Rust World!"),
            Some("first body"),
            Uuid::new_v4(),
            context(),
            &FixedClock::default(),
        )
        .unwrap();

        assert!(!post.has_domain_events());
    }

    #[test]
    fn test_publish_records_state_change_and_caused_update() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock::default();
        let mut post = draft(correlation_id);

        // Act
        post.publish(correlation_id, context(), &clock).unwrap();

        // Assert
        assert_eq!(post.status(), PostStatus::Published);
        assert_eq!(post.published_at(), Some(clock.0));
        let events = post.domain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(post.count_domain_events_of_type(EntityEventType::Created), 1);
        assert_eq!(post.count_domain_events_of_type(EntityEventType::StateChanged), 1);
        assert_eq!(post.count_domain_events_of_type(EntityEventType::Updated), 1);

        let state_changed = &events[1];
        let stamped = &events[2];
        match &state_changed.kind {
            EntityEventKind::StateChanged { from, to } => {
                assert_eq!(from, "DRAFT");
                assert_eq!(to, "PUBLISHED");
            }
            other => panic!("expected StateChanged, got {other:?}"),
        }
        assert!(state_changed.causation_id().is_none());
        assert_eq!(stamped.causation_id(), Some(state_changed.event_id()));
        assert_eq!(stamped.correlation_id(), Some(correlation_id));
    }

    #[test]
    fn test_publish_twice_is_rejected() {
        // Arrange
        let clock = FixedClock::default();
        let mut post = draft(Uuid::new_v4());
        post.publish(Uuid::new_v4(), context(), &clock).unwrap();
        let before = post.domain_events().len();

        // Act
        let result = post.publish(Uuid::new_v4(), context(), &clock);

        // Assert
        match result {
            Err(DomainError::InvalidStateTransition { from, to, .. }) => {
                assert_eq!(from, "PUBLISHED");
                assert_eq!(to, "PUBLISHED");
            }
            other => panic!("expected InvalidStateTransition, got {other:?}"),
        }
        assert_eq!(post.domain_events().len(), before);
    }

    #[test]
    fn test_archive_then_edit_is_rejected() {
        let clock = FixedClock::default();
        let mut post = draft(Uuid::new_v4());

        post.archive(Uuid::new_v4(), context(), &clock).unwrap();
        let edit = post.update_content(None, Some("x"), Uuid::new_v4(), context(), &clock);
        let again = post.archive(Uuid::new_v4(), context(), &clock);

        assert_eq!(post.status(), PostStatus::Archived);
        assert!(matches!(edit, Err(DomainError::Validation(_))));
        assert!(matches!(
            again,
            Err(DomainError::InvalidStateTransition { .. })
        ));
        assert!(post.has_domain_event_of_type(EntityEventType::StateChanged));
    }

    #[test]
    fn test_delete_records_reason() {
        let mut post = draft(Uuid::new_v4());
        post.clear_domain_events();

        post.delete(
            Some("duplicate".into()),
            Uuid::new_v4(),
            context(),
            &FixedClock::default(),
        );

        let events = post.domain_events_of_type(EntityEventType::Deleted);
        assert_eq!(events.len(), 1);
        match &events[0].kind {
            EntityEventKind::Deleted { reason } => assert_eq!(reason.as_deref(), Some("duplicate")),
            other => panic!("expected Deleted, got {other:?}"),
        }
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Rust -- 2024 Edition!  "), "rust-2024-edition");
        assert_eq!(slugify("ünïcode"), "n-code");
    }
}
