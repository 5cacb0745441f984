//! First-run bootstrap: creates the site owner and publishes a welcome post.
//!
//! Account, member, and post changes share one `UnitOfWork` and are
//! published together on commit. The banner goes through the media context's
//! direct publish path afterwards.

use blogcms_core::clock::Clock;
use blogcms_core::error::DomainError;
use blogcms_core::unit_of_work::UnitOfWork;
use blogcms_media::application::command_handlers::{
    handle_attach_media_to_post, handle_upload_media,
};
use blogcms_media::domain::commands::{AttachMediaToPost, UploadMedia};
use blogcms_member::application::command_handlers::handle_register_member;
use blogcms_member::domain::aggregates::MemberRole;
use blogcms_member::domain::commands::RegisterMember;
use blogcms_post::application::command_handlers::{handle_create_post, handle_publish_post};
use blogcms_post::application::query_handlers::{PostView, get_post_by_id};
use blogcms_post::domain::commands::{CreatePost, PublishPost};
use blogcms_user::application::command_handlers::handle_register_user;
use blogcms_user::domain::commands::RegisterUser;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// An image shown at the top of the welcome post.
#[derive(Debug, Clone)]
pub struct Banner {
    /// File name without path separators.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

/// Input for [`publish_welcome_post`].
#[derive(Debug, Clone)]
pub struct WelcomeRequest {
    /// Owner account login name.
    pub username: String,
    /// Owner e-mail, shared by the account and the member.
    pub email: String,
    /// Already hashed password.
    pub password_hash: String,
    /// Owner's public nickname.
    pub nickname: String,
    /// Welcome post title.
    pub title: String,
    /// Welcome post body.
    pub content: String,
    /// Optional image attached to the post.
    pub banner: Option<Banner>,
}

/// What the bootstrap produced.
#[derive(Debug, Clone)]
pub struct WelcomeSummary {
    /// Correlation id carried by every event.
    pub correlation_id: Uuid,
    /// Owner account id.
    pub user_id: Uuid,
    /// Owner member id.
    pub member_id: Uuid,
    /// Banner media id, when a banner was given.
    pub media_id: Option<Uuid>,
    /// The published welcome post.
    pub post: PostView,
    /// Events published by the unit of work and the media handlers.
    pub published_events: usize,
}

/// Registers the owner account and member, creates and publishes the welcome
/// post, then uploads and attaches the optional banner. Every event carries
/// the same correlation id.
///
/// # Errors
///
/// Returns `AppError::Domain` if any command fails. Aggregates saved before
/// the failure stay stored and their events are published.
#[instrument(skip_all, fields(username = %request.username))]
pub async fn publish_welcome_post(
    state: &AppState,
    request: &WelcomeRequest,
) -> Result<WelcomeSummary, AppError> {
    let clock = state.clock.as_ref();
    let correlation_id = Uuid::new_v4();
    let initiated_by = Some(request.username.clone());
    let user_id = Uuid::new_v4();
    let member_id = Uuid::new_v4();
    let post_id = Uuid::new_v4();
    let mut uow = UnitOfWork::new();

    let staged = stage_owner_and_post(
        state,
        request,
        OwnerIds {
            correlation_id,
            user_id,
            member_id,
            post_id,
        },
        &mut uow,
    )
    .await;
    let ((), mut published_events) = uow.commit_with(state.publisher.as_ref(), staged).await?;

    let media_id = match &request.banner {
        Some(banner) => {
            let media_id = Uuid::new_v4();
            let uploaded = handle_upload_media(
                &UploadMedia {
                    correlation_id,
                    initiated_by: initiated_by.clone(),
                    media_id,
                    uploader_id: member_id,
                    file_name: banner.file_name.clone(),
                    content_type: banner.content_type.clone(),
                    bytes: banner.bytes.clone(),
                },
                clock,
                state.media.as_ref(),
                state.publisher.as_ref(),
            )
            .await?;
            let attached = handle_attach_media_to_post(
                &AttachMediaToPost {
                    correlation_id,
                    initiated_by,
                    media_id,
                    post_id,
                },
                clock,
                state.media.as_ref(),
                state.publisher.as_ref(),
            )
            .await?;
            published_events += uploaded.published_events + attached.published_events;
            Some(media_id)
        }
        None => None,
    };

    let post = get_post_by_id(
        post_id,
        clock.now(),
        state.config.recently_updated_threshold,
        state.posts.as_ref(),
    )
    .await?;

    info!(%correlation_id, %post_id, published_events, "welcome post published");
    Ok(WelcomeSummary {
        correlation_id,
        user_id,
        member_id,
        media_id,
        post,
        published_events,
    })
}

#[derive(Debug, Clone, Copy)]
struct OwnerIds {
    correlation_id: Uuid,
    user_id: Uuid,
    member_id: Uuid,
    post_id: Uuid,
}

/// Saves the owner account, member and published post into `uow`. Stops at
/// the first failing command; whatever was saved before it stays collected.
async fn stage_owner_and_post(
    state: &AppState,
    request: &WelcomeRequest,
    ids: OwnerIds,
    uow: &mut UnitOfWork,
) -> Result<(), DomainError> {
    let clock = state.clock.as_ref();
    let initiated_by = Some(request.username.clone());

    handle_register_user(
        &RegisterUser {
            correlation_id: ids.correlation_id,
            initiated_by: initiated_by.clone(),
            user_id: ids.user_id,
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
        },
        clock,
        state.users.as_ref(),
        uow,
    )
    .await?;
    handle_register_member(
        &RegisterMember {
            correlation_id: ids.correlation_id,
            initiated_by: initiated_by.clone(),
            member_id: ids.member_id,
            email: request.email.clone(),
            nickname: request.nickname.clone(),
            role: MemberRole::Admin,
        },
        clock,
        state.members.as_ref(),
        uow,
    )
    .await?;
    handle_create_post(
        &CreatePost {
            correlation_id: ids.correlation_id,
            initiated_by: initiated_by.clone(),
            post_id: ids.post_id,
            author_id: ids.member_id,
            title: request.title.clone(),
            content: request.content.clone(),
        },
        clock,
        state.posts.as_ref(),
        uow,
    )
    .await?;
    handle_publish_post(
        &PublishPost {
            correlation_id: ids.correlation_id,
            initiated_by,
            post_id: ids.post_id,
        },
        clock,
        state.posts.as_ref(),
        uow,
    )
    .await?;
    Ok(())
}
