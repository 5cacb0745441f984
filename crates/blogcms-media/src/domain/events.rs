//! Domain events for the media context.

use blogcms_core::entity_event::{EntityEvent, EntitySnapshot};
use serde::Serialize;
use uuid::Uuid;

/// Event source recorded in every media event context.
pub const MEDIA_EVENT_SOURCE: &str = "blog.media";

/// Field names reported in `EntityUpdated.changed_fields`.
pub mod fields {
    pub const FILE_NAME: &str = "file_name";
    pub const POST_ID: &str = "post_id";
}

/// Media file state carried by `EntityCreated` and `EntityUpdated` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFileSnapshot {
    pub media_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the uploaded bytes.
    pub checksum: String,
    pub uploader_id: Uuid,
    pub post_id: Option<Uuid>,
}

impl EntitySnapshot for MediaFileSnapshot {
    const AGGREGATE_TYPE: &'static str = "MediaFile";
}

/// Domain event type recorded by the `MediaFile` aggregate.
pub type MediaFileEvent = EntityEvent<MediaFileSnapshot>;
