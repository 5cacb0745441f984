//! Aggregate roots for the user account context.

use std::fmt;

use blogcms_core::aggregate::{AggregateBase, AggregateRoot};
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::entity_event::EntitySnapshot;
use blogcms_core::error::DomainError;
use serde::Serialize;
use uuid::Uuid;

use super::events::{UserEvent, UserSnapshot, fields};

/// Username length bounds, in characters.
pub const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=32;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// May sign in.
    Active,
    /// Temporarily barred from signing in.
    Locked,
    /// Closed for good.
    Deactivated,
}

impl UserStatus {
    /// The name used in state-transition events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Locked => "LOCKED",
            Self::Deactivated => "DEACTIVATED",
        }
    }

    fn can_become(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Locked | Self::Deactivated)
                | (Self::Locked, Self::Active | Self::Deactivated)
        )
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn validate_username(username: &str) -> Result<String, DomainError> {
    let allowed = username
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    if !allowed || !USERNAME_LENGTH.contains(&username.len()) {
        return Err(DomainError::Validation(format!(
            "username must be {} to {} letters, digits, '_', '-' or '.'",
            USERNAME_LENGTH.start(),
            USERNAME_LENGTH.end()
        )));
    }
    Ok(username.to_owned())
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "'{email}' is not a valid e-mail address"
        )));
    }
    Ok(email.to_ascii_lowercase())
}

fn validate_password_hash(password_hash: &str) -> Result<String, DomainError> {
    if password_hash.trim().is_empty() {
        return Err(DomainError::Validation("password hash must not be empty".into()));
    }
    Ok(password_hash.to_owned())
}

/// The aggregate root for a login account.
#[derive(Debug, Clone)]
pub struct User {
    base: AggregateBase<UserEvent>,
    username: String,
    email: String,
    password_hash: String,
    status: UserStatus,
}

impl User {
    /// Registers an active account, recording an `EntityCreated` event.
    ///
    /// `password_hash` must already be hashed by the caller.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a malformed username, e-mail or
    /// empty hash.
    pub fn register(
        id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let mut user = Self {
            base: AggregateBase::new(id, clock.now()),
            username: validate_username(username)?,
            email: validate_email(email)?,
            password_hash: validate_password_hash(password_hash)?,
            status: UserStatus::Active,
        };
        let event = UserEvent::created(id, user.snapshot(), context, clock)
            .with_correlation_id(correlation_id);
        user.add_domain_event(event);
        Ok(user)
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    #[must_use]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Current state as an event payload.
    #[must_use]
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            user_id: self.aggregate_id(),
            username: self.username.clone(),
            email: self.email.clone(),
            status: self.status,
        }
    }

    /// Changes the e-mail address. The same address records nothing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the account is deactivated or the
    /// address is malformed.
    pub fn change_email(
        &mut self,
        email: &str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_not_deactivated()?;
        let email = validate_email(email)?;
        if email == self.email {
            return Ok(());
        }
        self.email = email;
        self.record_update(fields::EMAIL, correlation_id, context, clock);
        Ok(())
    }

    /// Replaces the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the account is deactivated or the
    /// hash is empty.
    pub fn change_password_hash(
        &mut self,
        password_hash: &str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.ensure_not_deactivated()?;
        self.password_hash = validate_password_hash(password_hash)?;
        self.record_update(fields::PASSWORD_HASH, correlation_id, context, clock);
        Ok(())
    }

    /// Locks an active account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the account is
    /// active.
    pub fn lock(
        &mut self,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.transition(UserStatus::Locked, correlation_id, context, clock)
    }

    /// Unlocks a locked account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless the account is
    /// locked.
    pub fn unlock(
        &mut self,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.transition(UserStatus::Active, correlation_id, context, clock)
    }

    /// Closes the account for good.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if already deactivated.
    pub fn deactivate(
        &mut self,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.transition(UserStatus::Deactivated, correlation_id, context, clock)
    }

    fn transition(
        &mut self,
        to: UserStatus,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let from = self.status;
        if !from.can_become(to) {
            return Err(DomainError::InvalidStateTransition {
                aggregate_type: UserSnapshot::AGGREGATE_TYPE,
                aggregate_id: self.aggregate_id(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;

        let event = UserEvent::state_changed(
            self.aggregate_id(),
            from.as_str(),
            to.as_str(),
            context,
            clock,
        )
        .with_correlation_id(correlation_id);
        self.add_domain_event(event);
        Ok(())
    }

    fn record_update(
        &mut self,
        field: &'static str,
        correlation_id: Uuid,
        context: EventContext,
        clock: &dyn Clock,
    ) {
        let event = UserEvent::updated(self.aggregate_id(), self.snapshot(), [field], context, clock)
            .with_correlation_id(correlation_id);
        self.add_domain_event(event);
    }

    fn ensure_not_deactivated(&self) -> Result<(), DomainError> {
        if self.status == UserStatus::Deactivated {
            return Err(DomainError::Validation(format!(
                "user {} is deactivated",
                self.aggregate_id()
            )));
        }
        Ok(())
    }
}

impl AggregateRoot for User {
    type Event = UserEvent;

    fn base(&self) -> &AggregateBase<UserEvent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase<UserEvent> {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogcms_core::entity_event::{EntityEventKind, EntityEventType};
    use blogcms_core::event::DomainEvent;
    use blogcms_test_support::FixedClock;

    fn context() -> EventContext {
        EventContext::new("blog.user")
    }

    fn registered() -> User {
        User::register(
            Uuid::new_v4(),
            "ferris_01",
            "ferris@example.org",
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            Uuid::new_v4(),
            context(),
            &FixedClock::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_register_payload_omits_password_hash() {
        let user = registered();

        let payload = user.domain_events()[0].to_payload().unwrap();

        assert_eq!(payload["snapshot"]["username"], "ferris_01");
        assert!(payload["snapshot"].get("password_hash").is_none());
        assert!(!payload.to_string().contains("argon2"));
    }

    #[test]
    fn test_register_rejects_bad_username() {
        let clock = FixedClock::default();
        let too_long = "x".repeat(33);
        for username in ["ab", "has space", "ünï", too_long.as_str()] {
            let result = User::register(
                Uuid::new_v4(),
                username,
                "a@b.io",
                "hash",
                Uuid::new_v4(),
                context(),
                &clock,
            );
            assert!(matches!(result, Err(DomainError::Validation(_))), "{username:?}");
        }
    }

    #[test]
    fn test_change_password_hash_reports_field_only() {
        let mut user = registered();
        user.clear_domain_events();

        user.change_password_hash("new-hash", Uuid::new_v4(), context(), &FixedClock::default())
            .unwrap();

        assert_eq!(user.password_hash(), "new-hash");
        match &user.domain_events()[0].kind {
            EntityEventKind::Updated { changed_fields, .. } => {
                assert!(changed_fields.contains(fields::PASSWORD_HASH));
            }
            other => panic!("expected Updated, got {other:?}"),
        }
    }

    #[test]
    fn test_change_email_same_address_records_nothing() {
        let mut user = registered();
        user.clear_domain_events();

        user.change_email("FERRIS@example.org", Uuid::new_v4(), context(), &FixedClock::default())
            .unwrap();

        assert!(!user.has_domain_events());
    }

    #[test]
    fn test_lock_unlock_deactivate_sequence() {
        // Arrange
        let clock = FixedClock::default();
        let mut user = registered();
        user.clear_domain_events();

        // Act
        user.lock(Uuid::new_v4(), context(), &clock).unwrap();
        user.unlock(Uuid::new_v4(), context(), &clock).unwrap();
        user.lock(Uuid::new_v4(), context(), &clock).unwrap();
        user.deactivate(Uuid::new_v4(), context(), &clock).unwrap();

        // Assert
        assert_eq!(user.status(), UserStatus::Deactivated);
        assert_eq!(
            user.count_domain_events_of_type(EntityEventType::StateChanged),
            4
        );
        match &user.domain_events()[3].kind {
            EntityEventKind::StateChanged { from, to } => {
                assert_eq!(from, "LOCKED");
                assert_eq!(to, "DEACTIVATED");
            }
            other => panic!("expected StateChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let clock = FixedClock::default();
        let mut user = registered();

        let unlock_active = user.unlock(Uuid::new_v4(), context(), &clock);
        user.deactivate(Uuid::new_v4(), context(), &clock).unwrap();
        let lock_deactivated = user.lock(Uuid::new_v4(), context(), &clock);
        let email = user.change_email("new@example.org", Uuid::new_v4(), context(), &clock);

        assert!(matches!(
            unlock_active,
            Err(DomainError::InvalidStateTransition { .. })
        ));
        assert!(matches!(
            lock_deactivated,
            Err(DomainError::InvalidStateTransition { .. })
        ));
        assert!(matches!(email, Err(DomainError::Validation(_))));
    }
}
