//! Command handlers for the Post context.
//!
//! Each handler loads the aggregate, runs the business method, saves it, and
//! moves the recorded events into the caller's `UnitOfWork`. Publishing
//! happens when the caller commits the unit of work.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::error::DomainError;
use blogcms_core::repository::AggregateRepository;
use blogcms_core::unit_of_work::UnitOfWork;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::Post;
use crate::domain::commands::{ArchivePost, CreatePost, DeletePost, PublishPost, UpdatePostContent};
use crate::domain::events::POST_EVENT_SOURCE;

/// Outcome of a successful Post command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCommandResult {
    /// The affected post.
    pub post_id: Uuid,
    /// Stored version after the command.
    pub version: i64,
    /// Events moved into the unit of work.
    pub collected_events: usize,
}

async fn load(post_id: Uuid, repo: &dyn AggregateRepository<Post>) -> Result<Post, DomainError> {
    repo.find_by_id(post_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(post_id))
}

async fn save(
    mut post: Post,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Post>,
    uow: &mut UnitOfWork,
) -> Result<PostCommandResult, DomainError> {
    let collected_events = uow.save_and_collect(&mut post, repo, clock).await?;
    Ok(PostCommandResult {
        post_id: post.aggregate_id(),
        version: post.version(),
        collected_events,
    })
}

/// Handles the `CreatePost` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a bad title, or the repository error
/// if the save fails.
pub async fn handle_create_post(
    command: &CreatePost,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Post>,
    uow: &mut UnitOfWork,
) -> Result<PostCommandResult, DomainError> {
    let post = Post::create(
        command.post_id,
        command.author_id,
        &command.title,
        &command.content,
        command.correlation_id,
        EventContext::for_command(POST_EVENT_SOURCE, command),
        clock,
    )?;
    info!(post_id = %command.post_id, slug = post.slug(), "post created");
    save(post, clock, repo, uow).await
}

/// Handles the `UpdatePostContent` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the post does not exist,
/// `DomainError::Validation` if it is archived or the title is invalid.
pub async fn handle_update_post_content(
    command: &UpdatePostContent,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Post>,
    uow: &mut UnitOfWork,
) -> Result<PostCommandResult, DomainError> {
    let mut post = load(command.post_id, repo).await?;
    post.update_content(
        command.title.as_deref(),
        command.content.as_deref(),
        command.correlation_id,
        EventContext::for_command(POST_EVENT_SOURCE, command),
        clock,
    )?;
    save(post, clock, repo, uow).await
}

/// Handles the `PublishPost` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the post does not exist and
/// `DomainError::InvalidStateTransition` if it is not a draft.
pub async fn handle_publish_post(
    command: &PublishPost,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Post>,
    uow: &mut UnitOfWork,
) -> Result<PostCommandResult, DomainError> {
    let mut post = load(command.post_id, repo).await?;
    post.publish(
        command.correlation_id,
        EventContext::for_command(POST_EVENT_SOURCE, command),
        clock,
    )?;
    info!(post_id = %command.post_id, "post published");
    save(post, clock, repo, uow).await
}

/// Handles the `ArchivePost` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the post does not exist and
/// `DomainError::InvalidStateTransition` if it is already archived.
pub async fn handle_archive_post(
    command: &ArchivePost,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Post>,
    uow: &mut UnitOfWork,
) -> Result<PostCommandResult, DomainError> {
    let mut post = load(command.post_id, repo).await?;
    post.archive(
        command.correlation_id,
        EventContext::for_command(POST_EVENT_SOURCE, command),
        clock,
    )?;
    info!(post_id = %command.post_id, "post archived");
    save(post, clock, repo, uow).await
}

/// Handles the `DeletePost` command: records `EntityDeleted`, removes the
/// post from the repository, then collects the event.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the post does not exist, or
/// the repository error if removal fails.
pub async fn handle_delete_post(
    command: &DeletePost,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Post>,
    uow: &mut UnitOfWork,
) -> Result<PostCommandResult, DomainError> {
    let mut post = load(command.post_id, repo).await?;
    post.delete(
        command.reason.clone(),
        command.correlation_id,
        EventContext::for_command(POST_EVENT_SOURCE, command),
        clock,
    );
    repo.delete(command.post_id).await?;
    let collected_events = uow.collect_from(&mut post);
    info!(post_id = %command.post_id, "post deleted");
    Ok(PostCommandResult {
        post_id: command.post_id,
        version: post.version(),
        collected_events,
    })
}
