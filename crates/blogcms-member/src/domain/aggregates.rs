//! Aggregate roots for the Member context.

use std::fmt;

use blogcms_core::aggregate::{AggregateBase, AggregateRoot};
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::entity_event::EntitySnapshot;
use blogcms_core::error::DomainError;
use blogcms_core::event::DomainEvent;
use serde::Serialize;
use uuid::Uuid;

use super::events::{MemberEvent, MemberSnapshot, WITHDRAWAL_REASON, fields};

/// Nickname length bounds, in characters.
pub const NICKNAME_LENGTH: std::ops::RangeInclusive<usize> = 2..=30;

/// Authoring permissions of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    /// May read and comment.
    Reader,
    /// May author posts.
    Writer,
    /// May manage other members.
    Admin,
}

impl MemberRole {
    /// The name used in state-transition events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reader => "READER",
            Self::Writer => "WRITER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Withdrawn,
}

impl MemberStatus {
    /// The name used in state-transition events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Withdrawn => "WITHDRAWN",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        });
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "'{email}' is not a valid e-mail address"
        )));
    }
    Ok(email.to_ascii_lowercase())
}

fn validate_nickname(nickname: &str) -> Result<String, DomainError> {
    let nickname = nickname.trim();
    if !NICKNAME_LENGTH.contains(&nickname.chars().count()) {
        return Err(DomainError::Validation(format!(
            "nickname must be between {} and {} characters",
            NICKNAME_LENGTH.start(),
            NICKNAME_LENGTH.end()
        )));
    }
    Ok(nickname.to_owned())
}

/// The aggregate root for a site member.
#[derive(Debug, Clone)]
pub struct Member {
    base: AggregateBase<MemberEvent>,
    email: String,
    nickname: String,
    role: MemberRole,
    status: MemberStatus,
}

impl Member {
    /// Registers an active member, recording an `EntityCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a malformed e-mail or a nickname
    /// outside the allowed length.
    pub fn register(
        id: Uuid,
        email: &str,
        nickname: &str,
        role: MemberRole,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let mut member = Self {
            base: AggregateBase::new(id, clock.now()),
            email: validate_email(email)?,
            nickname: validate_nickname(nickname)?,
            role,
            status: MemberStatus::Active,
        };
        let event = MemberEvent::created(id, member.snapshot(), context, clock)
            .with_correlation_id(correlation_id);
        member.add_domain_event(event);
        Ok(member)
    }

    /// Contact e-mail address, lowercased.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Display nickname.
    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Authoring permissions.
    #[must_use]
    pub fn role(&self) -> MemberRole {
        self.role
    }

    /// Membership status.
    #[must_use]
    pub fn status(&self) -> MemberStatus {
        self.status
    }

    /// Current state as an event payload.
    #[must_use]
    pub fn snapshot(&self) -> MemberSnapshot {
        MemberSnapshot {
            member_id: self.aggregate_id(),
            email: self.email.clone(),
            nickname: self.nickname.clone(),
            role: self.role,
            status: self.status,
        }
    }

    /// Changes the display nickname. No event is recorded if it is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the member has withdrawn or the
    /// nickname is invalid.
    pub fn change_nickname(
        &mut self,
        nickname: &str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        let nickname = validate_nickname(nickname)?;
        if nickname == self.nickname {
            return Ok(());
        }
        self.nickname = nickname;

        let event = MemberEvent::updated(
            self.aggregate_id(),
            self.snapshot(),
            [fields::NICKNAME],
            context,
            clock,
        )
        .with_correlation_id(correlation_id);
        self.add_domain_event(event);
        Ok(())
    }

    /// Grants a different role, recording `EntityStateChanged` between the
    /// role names. Granting the current role records nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the member has withdrawn.
    pub fn change_role(
        &mut self,
        role: MemberRole,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        if role == self.role {
            return Ok(());
        }
        let from = self.role;
        self.role = role;

        let event = MemberEvent::state_changed(
            self.aggregate_id(),
            from.as_str(),
            role.as_str(),
            context,
            clock,
        )
        .with_correlation_id(correlation_id);
        self.add_domain_event(event);
        Ok(())
    }

    /// Withdraws the member. Records `EntityStateChanged` (ACTIVE → WITHDRAWN)
    /// and an `EntityDeleted` caused by it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if already withdrawn.
    pub fn withdraw(
        &mut self,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.status == MemberStatus::Withdrawn {
            return Err(DomainError::InvalidStateTransition {
                aggregate_type: MemberSnapshot::AGGREGATE_TYPE,
                aggregate_id: self.aggregate_id(),
                from: self.status.to_string(),
                to: MemberStatus::Withdrawn.to_string(),
            });
        }
        self.status = MemberStatus::Withdrawn;

        let id = self.aggregate_id();
        let state_changed = MemberEvent::state_changed(
            id,
            MemberStatus::Active.as_str(),
            MemberStatus::Withdrawn.as_str(),
            context.clone(),
            clock,
        )
        .with_correlation_id(correlation_id);
        let deleted = state_changed.follow_up(|causation_id, correlation_id| {
            MemberEvent::deleted(id, Some(WITHDRAWAL_REASON.to_owned()), context, clock)
                .caused_by(causation_id, correlation_id)
        });
        self.add_domain_events([state_changed, deleted]);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status == MemberStatus::Withdrawn {
            return Err(DomainError::Validation(format!(
                "member {} has withdrawn",
                self.aggregate_id()
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for Member {
    type Event = MemberEvent;

    fn base(&self) -> &AggregateBase<MemberEvent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase<MemberEvent> {
        &mut self.base
    }
}
