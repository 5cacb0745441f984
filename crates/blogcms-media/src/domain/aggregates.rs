//! Aggregate roots for the media context.

use blogcms_core::aggregate::{AggregateBase, AggregateRoot};
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::error::DomainError;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::events::{MediaFileEvent, MediaFileSnapshot, fields};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Raw upload as received from the client.
#[derive(Debug, Clone, Copy)]
pub struct UploadedFile<'a> {
    /// Client-supplied file name.
    pub file_name: &'a str,
    /// MIME type, e.g. `image/png`.
    pub content_type: &'a str,
    /// File contents.
    pub bytes: &'a [u8],
}

/// Lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn validate_file_name(file_name: &str) -> Result<String, DomainError> {
    let file_name = file_name.trim();
    if file_name.is_empty() || file_name.contains(['/', '\\']) {
        return Err(DomainError::Validation(format!(
            "'{file_name}' is not a valid file name"
        )));
    }
    Ok(file_name.to_owned())
}

fn validate_content_type(content_type: &str) -> Result<String, DomainError> {
    let well_formed = content_type
        .split_once('/')
        .is_some_and(|(kind, subtype)| !kind.is_empty() && !subtype.is_empty());
    if !well_formed {
        return Err(DomainError::Validation(format!(
            "'{content_type}' is not a valid content type"
        )));
    }
    Ok(content_type.to_ascii_lowercase())
}

/// The aggregate root for an uploaded media file.
#[derive(Debug, Clone)]
pub struct MediaFile {
    base: AggregateBase<MediaFileEvent>,
    file_name: String,
    content_type: String,
    size_bytes: u64,
    checksum: String,
    uploader_id: Uuid,
    post_id: Option<Uuid>,
}

impl MediaFile {
    /// Accepts an upload, recording an `EntityCreated` event with the
    /// computed checksum.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty or oversized upload, a
    /// file name containing path separators, or a malformed content type.
    pub fn upload(
        id: Uuid,
        uploader_id: Uuid,
        file: UploadedFile<'_>,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        if file.bytes.is_empty() {
            return Err(DomainError::Validation("upload must not be empty".into()));
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(DomainError::Validation(format!(
                "upload of {} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit",
                file.bytes.len()
            )));
        }

        let mut media = Self {
            base: AggregateBase::new(id, clock.now()),
            file_name: validate_file_name(file.file_name)?,
            content_type: validate_content_type(file.content_type)?,
            size_bytes: file.bytes.len() as u64,
            checksum: checksum(file.bytes),
            uploader_id,
            post_id: None,
        };
        let event = MediaFileEvent::created(id, media.snapshot(), context, clock)
            .with_correlation_id(correlation_id);
        media.add_domain_event(event);
        Ok(media)
    }

    /// Stored file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Lowercased MIME type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Upload size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Lowercase hex SHA-256 of the uploaded bytes.
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Member who uploaded the file.
    #[must_use]
    pub fn uploader_id(&self) -> Uuid {
        self.uploader_id
    }

    /// The post this file is attached to, if any.
    #[must_use]
    pub fn post_id(&self) -> Option<Uuid> {
        self.post_id
    }

    /// Current state as an event payload.
    #[must_use]
    pub fn snapshot(&self) -> MediaFileSnapshot {
        MediaFileSnapshot {
            media_id: self.aggregate_id(),
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size_bytes: self.size_bytes,
            checksum: self.checksum.clone(),
            uploader_id: self.uploader_id,
            post_id: self.post_id,
        }
    }

    /// Renames the file. Same name records nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the new name is invalid.
    pub fn rename(
        &mut self,
        file_name: &str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let file_name = validate_file_name(file_name)?;
        if file_name == self.file_name {
            return Ok(());
        }
        self.file_name = file_name;
        self.record_update(fields::FILE_NAME, correlation_id, context, clock);
        Ok(())
    }

    /// Attaches the file to a post, replacing any previous attachment.
    /// Re-attaching to the same post records nothing.
    pub fn attach_to_post(
        &mut self,
        post_id: Uuid,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) {
        if self.post_id == Some(post_id) {
            return;
        }
        self.post_id = Some(post_id);
        self.record_update(fields::POST_ID, correlation_id, context, clock);
    }

    /// Records an `EntityDeleted` event.
    pub fn delete(
        &mut self,
        reason: Option<String>,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) {
        let event = MediaFileEvent::deleted(self.aggregate_id(), reason, context, clock)
            .with_correlation_id(correlation_id);
        self.add_domain_event(event);
    }

    fn record_update(
        &mut self,
        field: &'static str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) {
        let event =
            MediaFileEvent::updated(self.aggregate_id(), self.snapshot(), [field], context, clock)
                .with_correlation_id(correlation_id);
        self.add_domain_event(event);
    }
}

impl AggregateRoot for MediaFile {
    type Event = MediaFileEvent;

    fn base(&self) -> &AggregateBase<MediaFileEvent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase<MediaFileEvent> {
        &mut self.base
    }
}
