//! Commands for the user account context.

use blogcms_core::command::Command;
use uuid::Uuid;

/// Command to register a login account.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// Identifier to assign to the account.
    pub user_id: Uuid,
    /// Login name.
    pub username: String,
    /// Contact e-mail address.
    pub email: String,
    /// Password hash produced by the caller.
    pub password_hash: String,
}

/// Command to change an account's e-mail address.
#[derive(Debug, Clone)]
pub struct ChangeEmail {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The account to update.
    pub user_id: Uuid,
    /// New address.
    pub email: String,
}

/// Command to replace an account's password hash.
#[derive(Debug, Clone)]
pub struct ChangePasswordHash {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The account to update.
    pub user_id: Uuid,
    /// New password hash produced by the caller.
    pub password_hash: String,
}

/// Account status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Lock,
    Unlock,
    Deactivate,
}

impl StatusChange {
    fn command_type(self) -> &'static str {
        match self {
            Self::Lock => "user.lock",
            Self::Unlock => "user.unlock",
            Self::Deactivate => "user.deactivate",
        }
    }
}

/// Command to lock, unlock, or deactivate an account.
#[derive(Debug, Clone)]
pub struct ChangeUserStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The acting user, if known.
    pub initiated_by: Option<String>,
    /// The account to update.
    pub user_id: Uuid,
    /// Requested change.
    pub change: StatusChange,
}

impl Command for RegisterUser {
    fn command_type(&self) -> &'static str {
        "user.register"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}

impl Command for ChangeEmail {
    fn command_type(&self) -> &'static str {
        "user.change_email"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}

impl Command for ChangePasswordHash {
    fn command_type(&self) -> &'static str {
        "user.change_password_hash"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}

impl Command for ChangeUserStatus {
    fn command_type(&self) -> &'static str {
        self.change.command_type()
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }
}
