//! Domain events for the Member context.

use blogcms_core::entity_event::{EntityEvent, EntitySnapshot};
use serde::Serialize;
use uuid::Uuid;

use super::aggregates::{MemberRole, MemberStatus};

/// Event source recorded in every Member event context.
pub const MEMBER_EVENT_SOURCE: &str = "blog.member";

/// Reason attached to the `EntityDeleted` event that follows a withdrawal.
pub const WITHDRAWAL_REASON: &str = "member withdrew";

/// Field names reported in `EntityUpdated.changed_fields`.
pub mod fields {
    /// Display nickname.
    pub const NICKNAME: &str = "nickname";
}

/// Member state carried by `EntityCreated` and `EntityUpdated` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
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
}

impl EntitySnapshot for MemberSnapshot {
    const AGGREGATE_TYPE: &'static str = "Member";
}

/// Domain event type recorded by the `Member` aggregate.
pub type MemberEvent = EntityEvent<MemberSnapshot>;
