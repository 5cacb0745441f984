//! Domain events for the user account context.

use blogcms_core::entity_event::{EntityEvent, EntitySnapshot};
use serde::Serialize;
use uuid::Uuid;

use super::aggregates::UserStatus;

/// Event source recorded in every user event context.
pub const USER_EVENT_SOURCE: &str = "blog.user";

/// Field names reported in `EntityUpdated.changed_fields`.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const PASSWORD_HASH: &str = "password_hash";
}

/// User state carried by `EntityCreated` and `EntityUpdated` payloads.
///
/// The password hash is never part of an event payload; a credential change
/// is visible only through `changed_fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSnapshot {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
}

impl EntitySnapshot for UserSnapshot {
    const AGGREGATE_TYPE: &'static str = "User";
}

/// Domain event type recorded by the `User` aggregate.
pub type UserEvent = EntityEvent<UserSnapshot>;
