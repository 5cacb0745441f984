//! Command handlers for the media context.
//!
//! Media handlers publish immediately: each one saves the aggregate and then
//! drains and publishes its events through `save_and_publish`.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::error::DomainError;
use blogcms_core::persistence::{delete_and_publish, save_and_publish};
use blogcms_core::publisher::DomainEventPublisher;
use blogcms_core::repository::AggregateRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::{MediaFile, UploadedFile};
use crate::domain::commands::{AttachMediaToPost, DeleteMedia, RenameMedia, UploadMedia};
use crate::domain::events::MEDIA_EVENT_SOURCE;

/// Outcome of a successful media command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaCommandResult {
    /// The affected file.
    pub media_id: Uuid,
    /// Stored version after the command.
    pub version: i64,
    /// Events handed to the publisher.
    pub published_events: usize,
}

pub(crate) async fn load(
    media_id: Uuid,
    repo: &dyn AggregateRepository<MediaFile>,
) -> Result<MediaFile, DomainError> {
    repo.find_by_id(media_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(media_id))
}

async fn persist(
    mut media: MediaFile,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<MediaFile>,
    publisher: &dyn DomainEventPublisher,
) -> Result<MediaCommandResult, DomainError> {
    let published_events = save_and_publish(&mut media, repo, publisher, clock).await?;
    Ok(MediaCommandResult {
        media_id: media.aggregate_id(),
        version: media.version(),
        published_events,
    })
}

/// Handles the `UploadMedia` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a rejected upload, the repository
/// error if the save fails, or the first publish error.
pub async fn handle_upload_media(
    command: &UploadMedia,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<MediaFile>,
    publisher: &dyn DomainEventPublisher,
) -> Result<MediaCommandResult, DomainError> {
    let file = UploadedFile {
        file_name: &command.file_name,
        content_type: &command.content_type,
        bytes: &command.bytes,
    };
    let media = MediaFile::upload(
        command.media_id,
        command.uploader_id,
        file,
        command.correlation_id,
        EventContext::for_command(MEDIA_EVENT_SOURCE, command),
        clock,
    )?;
    info!(
        media_id = %command.media_id,
        size_bytes = media.size_bytes(),
        checksum = media.checksum(),
        "media uploaded"
    );
    persist(media, clock, repo, publisher).await
}

/// Handles the `RenameMedia` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the file does not exist and
/// `DomainError::Validation` for an invalid name.
pub async fn handle_rename_media(
    command: &RenameMedia,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<MediaFile>,
    publisher: &dyn DomainEventPublisher,
) -> Result<MediaCommandResult, DomainError> {
    let mut media = load(command.media_id, repo).await?;
    media.rename(
        &command.file_name,
        command.correlation_id,
        EventContext::for_command(MEDIA_EVENT_SOURCE, command),
        clock,
    )?;
    persist(media, clock, repo, publisher).await
}

/// Handles the `AttachMediaToPost` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the file does not exist.
pub async fn handle_attach_media_to_post(
    command: &AttachMediaToPost,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<MediaFile>,
    publisher: &dyn DomainEventPublisher,
) -> Result<MediaCommandResult, DomainError> {
    let mut media = load(command.media_id, repo).await?;
    media.attach_to_post(
        command.post_id,
        command.correlation_id,
        EventContext::for_command(MEDIA_EVENT_SOURCE, command),
        clock,
    );
    info!(media_id = %command.media_id, post_id = %command.post_id, "media attached");
    persist(media, clock, repo, publisher).await
}

/// Handles the `DeleteMedia` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the file does not exist, the
/// repository error if removal fails, or the first publish error.
pub async fn handle_delete_media(
    command: &DeleteMedia,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<MediaFile>,
    publisher: &dyn DomainEventPublisher,
) -> Result<MediaCommandResult, DomainError> {
    let mut media = load(command.media_id, repo).await?;
    media.delete(
        command.reason.clone(),
        command.correlation_id,
        EventContext::for_command(MEDIA_EVENT_SOURCE, command),
        clock,
    );
    let published_events = delete_and_publish(&mut media, repo, publisher).await?;
    info!(media_id = %command.media_id, "media deleted");
    Ok(MediaCommandResult {
        media_id: command.media_id,
        version: media.version(),
        published_events,
    })
}

#[cfg(test)]
mod tests {
    use blogcms_store::InMemoryRepository;
    use blogcms_test_support::{
        FailingEventPublisher, FailingRepository, FixedClock, RecordingEventPublisher,
    };

    use super::*;
    use crate::domain::aggregates::checksum;

    fn upload_command(media_id: Uuid) -> UploadMedia {
        UploadMedia {
            correlation_id: Uuid::new_v4(),
            initiated_by: Some("alice".to_owned()),
            media_id,
            uploader_id: Uuid::new_v4(),
            file_name: "diagram.svg".to_owned(),
            content_type: "image/svg+xml".to_owned(),
            bytes: b"<svg/>".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_handle_upload_media_saves_and_publishes() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<MediaFile> = InMemoryRepository::new();
        let publisher = RecordingEventPublisher::new();
        let command = upload_command(Uuid::new_v4());

        // Act
        let result = handle_upload_media(&command, &clock, &repo, &publisher)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.version, 1);
        assert_eq!(result.published_events, 1);
        let records = publisher.published();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].aggregate_type, "MediaFile");
        assert_eq!(records[0].payload["snapshot"]["checksum"], checksum(b"<svg/>"));
        assert_eq!(records[0].payload["snapshot"]["size_bytes"], 6);

        let stored = load(command.media_id, &repo).await.unwrap();
        assert!(!stored.has_domain_events());
    }

    #[tokio::test]
    async fn test_handle_upload_media_failed_save_publishes_nothing() {
        let clock = FixedClock::default();
        let repo: FailingRepository<MediaFile> = FailingRepository::new();
        let publisher = RecordingEventPublisher::new();

        let result = handle_upload_media(&upload_command(Uuid::new_v4()), &clock, &repo, &publisher).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_handle_upload_media_publish_failure_keeps_saved_state() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<MediaFile> = InMemoryRepository::new();
        let command = upload_command(Uuid::new_v4());

        // Act
        let result = handle_upload_media(&command, &clock, &repo, &FailingEventPublisher).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Publish { .. })));
        assert!(load(command.media_id, &repo).await.is_ok());
    }

    #[tokio::test]
    async fn test_rename_attach_and_delete_flow() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<MediaFile> = InMemoryRepository::new();
        let publisher = RecordingEventPublisher::new();
        let media_id = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        handle_upload_media(&upload_command(media_id), &clock, &repo, &publisher)
            .await
            .unwrap();

        // Act
        handle_rename_media(
            &RenameMedia {
                correlation_id: Uuid::new_v4(),
                initiated_by: None,
                media_id,
                file_name: "architecture.svg".to_owned(),
            },
            &clock,
            &repo,
            &publisher,
        )
        .await
        .unwrap();
        let attached = handle_attach_media_to_post(
            &AttachMediaToPost {
                correlation_id: Uuid::new_v4(),
                initiated_by: None,
                media_id,
                post_id,
            },
            &clock,
            &repo,
            &publisher,
        )
        .await
        .unwrap();
        let deleted = handle_delete_media(
            &DeleteMedia {
                correlation_id: Uuid::new_v4(),
                initiated_by: Some("moderator".to_owned()),
                media_id,
                reason: Some("copyright".to_owned()),
            },
            &clock,
            &repo,
            &publisher,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(attached.version, 3);
        assert_eq!(deleted.published_events, 1);
        assert_eq!(
            publisher.published_types(),
            vec![
                "EntityCreated",
                "EntityUpdated",
                "EntityUpdated",
                "EntityDeleted"
            ]
        );
        let records = publisher.published();
        assert_eq!(records[2].payload["changed_fields"][0], "post_id");
        assert_eq!(records[3].payload["reason"], "copyright");
        assert!(matches!(
            load(media_id, &repo).await,
            Err(DomainError::AggregateNotFound(_))
        ));
    }
}
