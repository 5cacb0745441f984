//! Query handlers for the media context.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::error::DomainError;
use blogcms_core::repository::AggregateRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::MediaFile;

/// Read-only view of a media file.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFileView {
    /// Media file identifier.
    pub media_id: Uuid,
    /// Stored file name.
    pub file_name: String,
    /// Lowercased MIME type.
    pub content_type: String,
    /// Upload size in bytes.
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the content.
    pub checksum: String,
    /// Member who uploaded the file.
    pub uploader_id: Uuid,
    /// Attached post, if any.
    pub post_id: Option<Uuid>,
    /// Number of successful saves.
    pub version: i64,
}

/// Retrieves a media file by ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no file exists for the ID.
pub async fn get_media_by_id(
    media_id: Uuid,
    repo: &dyn AggregateRepository<MediaFile>,
) -> Result<MediaFileView, DomainError> {
    let media = command_handlers::load(media_id, repo).await?;
    Ok(MediaFileView {
        media_id,
        file_name: media.file_name().to_owned(),
        content_type: media.content_type().to_owned(),
        size_bytes: media.size_bytes(),
        checksum: media.checksum().to_owned(),
        uploader_id: media.uploader_id(),
        post_id: media.post_id(),
        version: media.version(),
    })
}

#[cfg(test)]
mod tests {
    use blogcms_store::InMemoryRepository;
    use blogcms_test_support::{FixedClock, RecordingEventPublisher};

    use super::*;
    use crate::application::command_handlers::handle_upload_media;
    use crate::domain::commands::UploadMedia;

    #[tokio::test]
    async fn test_get_media_by_id_returns_view() {
        // Arrange
        let repo: InMemoryRepository<MediaFile> = InMemoryRepository::new();
        let media_id = Uuid::new_v4();
        let uploader_id = Uuid::new_v4();
        handle_upload_media(
            &UploadMedia {
                correlation_id: Uuid::new_v4(),
                initiated_by: None,
                media_id,
                uploader_id,
                file_name: "notes.txt".to_owned(),
                content_type: "text/plain".to_owned(),
                bytes: b"hello".to_vec(),
            },
            &FixedClock::default(),
            &repo,
            &RecordingEventPublisher::new(),
        )
        .await
        .unwrap();

        // Act
        let view = get_media_by_id(media_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.file_name, "notes.txt");
        assert_eq!(view.size_bytes, 5);
        assert_eq!(view.uploader_id, uploader_id);
        assert_eq!(
            view.checksum,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert!(view.post_id.is_none());
    }

    #[tokio::test]
    async fn test_get_media_by_id_not_found() {
        let repo: InMemoryRepository<MediaFile> = InMemoryRepository::new();

        let result = get_media_by_id(Uuid::new_v4(), &repo).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
