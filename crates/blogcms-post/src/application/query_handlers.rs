//! Query handlers for the Post context.
//!
//! Queries load aggregates and return read-only view DTOs. They never touch
//! the pending event buffer.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::error::DomainError;
use blogcms_core::lifecycle::LifecycleState;
use blogcms_core::repository::AggregateRepository;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Post, PostStatus};

/// Read-only view of a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    /// The post identifier.
    pub post_id: Uuid,
    /// The author (member) identifier.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Post body.
    pub content: String,
    /// Editorial status.
    pub status: PostStatus,
    /// First publication time.
    pub published_at: Option<DateTime<Utc>>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last saved.
    pub updated_at: Option<DateTime<Utc>>,
    /// Persistence lifecycle classification at query time.
    pub lifecycle: LifecycleState,
    /// Stored version.
    pub version: i64,
}

impl PostView {
    fn from_post(post: &Post, now: DateTime<Utc>, recency_threshold: Duration) -> Self {
        let timestamps = post.timestamps();
        Self {
            post_id: post.aggregate_id(),
            author_id: post.author_id(),
            title: post.title().to_owned(),
            slug: post.slug().to_owned(),
            content: post.content().to_owned(),
            status: post.status(),
            published_at: post.published_at(),
            created_at: timestamps.created_at,
            updated_at: timestamps.updated_at,
            lifecycle: post.lifecycle_state(now, recency_threshold),
            version: post.version(),
        }
    }
}

/// Retrieves a post by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no post exists for the ID, or
/// the repository error if loading fails.
pub async fn get_post_by_id(
    post_id: Uuid,
    now: DateTime<Utc>,
    recency_threshold: Duration,
    repo: &dyn AggregateRepository<Post>,
) -> Result<PostView, DomainError> {
    let post = repo
        .find_by_id(post_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(post_id))?;
    Ok(PostView::from_post(&post, now, recency_threshold))
}
