//! Commands for the media context.

use blogcms_core::command::Command;
use uuid::Uuid;

/// Command to upload a media file.
#[derive(Debug, Clone)]
pub struct UploadMedia {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// Identifier to assign to the file.
    pub media_id: Uuid,
    /// The uploading member.
    pub uploader_id: Uuid,
    /// Client-supplied file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Command to rename a media file.
#[derive(Debug, Clone)]
pub struct RenameMedia {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The file to rename.
    pub media_id: Uuid,
    /// New file name.
    pub file_name: String,
}

/// Command to attach a media file to a post.
#[derive(Debug, Clone)]
pub struct AttachMediaToPost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The file to attach.
    pub media_id: Uuid,
    /// The post receiving the file.
    pub post_id: Uuid,
}

/// Command to delete a media file.
#[derive(Debug, Clone)]
pub struct DeleteMedia {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The file to delete.
    pub media_id: Uuid,
    /// Why the file is being removed.
    pub reason: Option<String>,
}

macro_rules! impl_command {
    ($($command:ty => $name:literal),+ $(,)?) => {
        $(
            impl Command for $command {
                fn command_type(&self) -> &'static str {
                    $name
                }

                fn correlation_id(&self) -> Uuid {
                    self.correlation_id
                }

                fn initiated_by(&self) -> Option<&str> {
                    self.initiated_by.as_deref()
                }
            }
        )+
    };
}

impl_command! {
    UploadMedia => "media.upload",
    RenameMedia => "media.rename",
    AttachMediaToPost => "media.attach_to_post",
    DeleteMedia => "media.delete",
}
