//! Query handlers for the Member context.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::error::DomainError;
use blogcms_core::lifecycle::LifecycleState;
use blogcms_core::repository::AggregateRepository;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::{Member, MemberRole, MemberStatus};

/// Read-only view of a member.
#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    /// The member identifier.
    pub member_id: Uuid,
    /// Contact e-mail address.
    pub email: String,
    /// Display nickname.
    pub nickname: String,
    /// Authoring permissions.
    pub role: MemberRole,
    /// Membership status.
    pub status: MemberStatus,
    /// Persistence lifecycle classification at query time.
    pub lifecycle: LifecycleState,
    /// Stored version.
    pub version: i64,
}

/// Retrieves a member by ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no member exists for the ID.
pub async fn get_member_by_id(
    member_id: Uuid,
    now: DateTime<Utc>,
    recency_threshold: Duration,
    repo: &dyn AggregateRepository<Member>,
) -> Result<MemberView, DomainError> {
    let member = command_handlers::load(member_id, repo).await?;
    Ok(MemberView {
        member_id,
        email: member.email().to_owned(),
        nickname: member.nickname().to_owned(),
        role: member.role(),
        status: member.status(),
        lifecycle: member.lifecycle_state(now, recency_threshold),
        version: member.version(),
    })
}
