//! Commands for the Post context.

use blogcms_core::command::Command;
use uuid::Uuid;

/// Command to create a draft post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// Identifier to assign to the new post.
    pub post_id: Uuid,
    /// The authoring member.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
}

/// Command to edit a post's title and/or body.
#[derive(Debug, Clone)]
pub struct UpdatePostContent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The post to edit.
    pub post_id: Uuid,
    /// New title, if changing.
    pub title: Option<String>,
    /// New body, if changing.
    pub content: Option<String>,
}

/// Command to publish a draft post.
#[derive(Debug, Clone)]
pub struct PublishPost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The post to publish.
    pub post_id: Uuid,
}

/// Command to archive a post.
#[derive(Debug, Clone)]
pub struct ArchivePost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The post to archive.
    pub post_id: Uuid,
}

/// Command to delete a post.
#[derive(Debug, Clone)]
pub struct DeletePost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The post to delete.
    pub post_id: Uuid,
    /// Why the post is being removed.
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
    CreatePost => "post.create",
    UpdatePostContent => "post.update_content",
    PublishPost => "post.publish",
    ArchivePost => "post.archive",
    DeletePost => "post.delete",
}
