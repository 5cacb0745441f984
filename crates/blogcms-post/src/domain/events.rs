//! Domain events for the Post context.

use blogcms_core::entity_event::{EntityEvent, EntitySnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::aggregates::PostStatus;

/// Event source recorded in every Post event context.
pub const POST_EVENT_SOURCE: &str = "blog.post";

/// Field names reported in `EntityUpdated.changed_fields`.
pub mod fields {
    /// The post title (the slug follows it).
    pub const TITLE: &str = "title";
    /// The URL slug.
    pub const SLUG: &str = "slug";
    /// The post body.
    pub const CONTENT: &str = "content";
    /// The first publication timestamp.
    pub const PUBLISHED_AT: &str = "published_at";
}

/// Post state carried by `EntityCreated` and `EntityUpdated` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSnapshot {
    /// The post identifier.
    pub post_id: Uuid,
    /// The author (member) identifier.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// URL slug derived from the title.
    pub slug: String,
    /// Post body.
    pub content: String,
    /// Editorial status.
    pub status: PostStatus,
    /// When the post was first published.
    pub published_at: Option<DateTime<Utc>>,
}

impl EntitySnapshot for PostSnapshot {
    const AGGREGATE_TYPE: &'static str = "Post";
}

/// Domain event type recorded by the `Post` aggregate.
pub type PostEvent = EntityEvent<PostSnapshot>;
