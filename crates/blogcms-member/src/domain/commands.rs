//! Commands for the Member context.

use blogcms_core::command::Command;
use uuid::Uuid;

use super::aggregates::MemberRole;

/// Command to register a new member.
#[derive(Debug, Clone)]
pub struct RegisterMember {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// Identifier to assign to the member.
    pub member_id: Uuid,
    /// Contact e-mail address.
    pub email: String,
    /// Display nickname.
    pub nickname: String,
    /// Initial role.
    pub role: MemberRole,
}

/// Command to change a member's nickname.
#[derive(Debug, Clone)]
pub struct ChangeNickname {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The member to rename.
    pub member_id: Uuid,
    /// New nickname.
    pub nickname: String,
}

/// Command to grant a member a different role.
#[derive(Debug, Clone)]
pub struct ChangeRole {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The member whose role changes.
    pub member_id: Uuid,
    /// Role to grant.
    pub role: MemberRole,
}

/// Command to withdraw a member.
#[derive(Debug, Clone)]
pub struct WithdrawMember {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The member leaving the site.
    pub member_id: Uuid,
}

impl Command for RegisterMember {
    fn command_type(&self) -> &'static str {
        "member.register"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}

impl Command for ChangeNickname {
    fn command_type(&self) -> &'static str {
        "member.change_nickname"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}

impl Command for ChangeRole {
    fn command_type(&self) -> &'static str {
        "member.change_role"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}

impl Command for WithdrawMember {
    fn command_type(&self) -> &'static str {
        "member.withdraw"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}
