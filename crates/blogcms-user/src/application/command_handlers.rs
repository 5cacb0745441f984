//! Command handlers for the user account context.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::error::DomainError;
use blogcms_core::repository::AggregateRepository;
use blogcms_core::unit_of_work::UnitOfWork;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::aggregates::User;
use crate::domain::commands::{
    ChangeEmail, ChangePasswordHash, ChangeUserStatus, RegisterUser, StatusChange,
};
use crate::domain::events::USER_EVENT_SOURCE;

/// Outcome of a successful user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCommandResult {
    /// The affected account.
    pub user_id: Uuid,
    /// Stored version after the command.
    pub version: i64,
    /// Events moved into the unit of work.
    pub collected_events: usize,
}

pub(crate) async fn load(
    user_id: Uuid,
    repo: &dyn AggregateRepository<User>,
) -> Result<User, DomainError> {
    repo.find_by_id(user_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(user_id))
}

async fn save(
    mut user: User,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<User>,
    uow: &mut UnitOfWork,
) -> Result<UserCommandResult, DomainError> {
    let collected_events = uow.save_and_collect(&mut user, repo, clock).await?;
    Ok(UserCommandResult {
        user_id: user.aggregate_id(),
        version: user.version(),
        collected_events,
    })
}

/// Handles the `RegisterUser` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a taken id or malformed input, or
/// the repository error if the save fails.
pub async fn handle_register_user(
    command: &RegisterUser,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<User>,
    uow: &mut UnitOfWork,
) -> Result<UserCommandResult, DomainError> {
    if repo.find_by_id(command.user_id).await?.is_some() {
        return Err(DomainError::Validation(format!(
            "user {} already exists",
            command.user_id
        )));
    }
    let user = User::register(
        command.user_id,
        &command.username,
        &command.email,
        &command.password_hash,
        command.correlation_id,
        EventContext::for_command(USER_EVENT_SOURCE, command),
        clock,
    )?;
    info!(user_id = %command.user_id, username = user.username(), "user registered");
    save(user, clock, repo, uow).await
}

/// Handles the `ChangeEmail` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the account does not exist and
/// `DomainError::Validation` if it is deactivated or the address is invalid.
pub async fn handle_change_email(
    command: &ChangeEmail,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<User>,
    uow: &mut UnitOfWork,
) -> Result<UserCommandResult, DomainError> {
    let mut user = load(command.user_id, repo).await?;
    user.change_email(
        &command.email,
        command.correlation_id,
        EventContext::for_command(USER_EVENT_SOURCE, command),
        clock,
    )?;
    save(user, clock, repo, uow).await
}

/// Handles the `ChangePasswordHash` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the account does not exist and
/// `DomainError::Validation` if it is deactivated or the hash is empty.
pub async fn handle_change_password_hash(
    command: &ChangePasswordHash,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<User>,
    uow: &mut UnitOfWork,
) -> Result<UserCommandResult, DomainError> {
    let mut user = load(command.user_id, repo).await?;
    user.change_password_hash(
        &command.password_hash,
        command.correlation_id,
        EventContext::for_command(USER_EVENT_SOURCE, command),
        clock,
    )?;
    info!(user_id = %command.user_id, "password changed");
    save(user, clock, repo, uow).await
}

/// Handles the `ChangeUserStatus` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the account does not exist and
/// `DomainError::InvalidStateTransition` if the change is not allowed from
/// the current status.
pub async fn handle_change_user_status(
    command: &ChangeUserStatus,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<User>,
    uow: &mut UnitOfWork,
) -> Result<UserCommandResult, DomainError> {
    let mut user = load(command.user_id, repo).await?;
    let context = EventContext::for_command(USER_EVENT_SOURCE, command);
    let result = match command.change {
        StatusChange::Lock => user.lock(command.correlation_id, context, clock),
        StatusChange::Unlock => user.unlock(command.correlation_id, context, clock),
        StatusChange::Deactivate => user.deactivate(command.correlation_id, context, clock),
    };
    if let Err(err) = result {
        warn!(user_id = %command.user_id, change = ?command.change, error = %err, "status change rejected");
        return Err(err);
    }
    info!(user_id = %command.user_id, status = %user.status(), "user status changed");
    save(user, clock, repo, uow).await
}

#[cfg(test)]
mod tests {
    use blogcms_core::event::DomainEvent;
    use blogcms_store::InMemoryRepository;
    use blogcms_test_support::{FixedClock, RecordingEventPublisher};

    use super::*;
    use crate::domain::aggregates::UserStatus;

    fn register_command(user_id: Uuid) -> RegisterUser {
        RegisterUser {
            correlation_id: Uuid::new_v4(),
            initiated_by: None,
            user_id,
            username: "ferris".to_owned(),
            email: "ferris@example.org".to_owned(),
            password_hash: "hash-1".to_owned(),
        }
    }

    fn status_command(user_id: Uuid, change: StatusChange) -> ChangeUserStatus {
        ChangeUserStatus {
            correlation_id: Uuid::new_v4(),
            initiated_by: Some("admin".to_owned()),
            user_id,
            change,
        }
    }

    #[tokio::test]
    async fn test_handle_register_user_collects_created_event() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<User> = InMemoryRepository::new();
        let mut uow = UnitOfWork::new();
        let command = register_command(Uuid::new_v4());

        // Act
        let result = handle_register_user(&command, &clock, &repo, &mut uow)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.version, 1);
        assert_eq!(result.collected_events, 1);
        assert_eq!(uow.pending()[0].aggregate_type(), "User");
    }

    #[tokio::test]
    async fn test_handle_change_user_status_records_command_type_in_context() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<User> = InMemoryRepository::new();
        let publisher = RecordingEventPublisher::new();
        let user_id = Uuid::new_v4();
        let mut uow = UnitOfWork::new();
        handle_register_user(&register_command(user_id), &clock, &repo, &mut uow)
            .await
            .unwrap();
        uow.commit(&publisher).await.unwrap();

        // Act
        handle_change_user_status(&status_command(user_id, StatusChange::Lock), &clock, &repo, &mut uow)
            .await
            .unwrap();
        uow.commit(&publisher).await.unwrap();

        // Assert
        let records = publisher.published();
        assert_eq!(records.len(), 2);
        let context = records[1].context.as_ref().unwrap();
        assert_eq!(context.metadata["command"], "user.lock");
        assert_eq!(context.initiated_by.as_deref(), Some("admin"));
        assert_eq!(records[1].payload["to"], "LOCKED");

        let stored = load(user_id, &repo).await.unwrap();
        assert_eq!(stored.status(), UserStatus::Locked);
    }

    #[tokio::test]
    async fn test_rejected_status_change_leaves_stored_user_untouched() {
        let clock = FixedClock::default();
        let repo: InMemoryRepository<User> = InMemoryRepository::new();
        let user_id = Uuid::new_v4();
        let mut uow = UnitOfWork::new();
        handle_register_user(&register_command(user_id), &clock, &repo, &mut uow)
            .await
            .unwrap();
        let mut second = UnitOfWork::new();

        let result = handle_change_user_status(
            &status_command(user_id, StatusChange::Unlock),
            &clock,
            &repo,
            &mut second,
        )
        .await;

        assert!(matches!(
            result,
            Err(DomainError::InvalidStateTransition { .. })
        ));
        assert!(second.is_empty());
        assert_eq!(load(user_id, &repo).await.unwrap().version(), 1);
    }

    #[tokio::test]
    async fn test_handle_change_password_hash_updates_stored_hash() {
        let clock = FixedClock::default();
        let repo: InMemoryRepository<User> = InMemoryRepository::new();
        let user_id = Uuid::new_v4();
        let mut uow = UnitOfWork::new();
        handle_register_user(&register_command(user_id), &clock, &repo, &mut uow)
            .await
            .unwrap();

        handle_change_password_hash(
            &ChangePasswordHash {
                correlation_id: Uuid::new_v4(),
                initiated_by: None,
                user_id,
                password_hash: "hash-2".to_owned(),
            },
            &clock,
            &repo,
            &mut uow,
        )
        .await
        .unwrap();

        assert_eq!(load(user_id, &repo).await.unwrap().password_hash(), "hash-2");
        assert_eq!(uow.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_handle_change_email_unknown_user() {
        let clock = FixedClock::default();
        let repo: InMemoryRepository<User> = InMemoryRepository::new();
        let mut uow = UnitOfWork::new();

        let result = handle_change_email(
            &ChangeEmail {
                correlation_id: Uuid::new_v4(),
                initiated_by: None,
                user_id: Uuid::new_v4(),
                email: "x@y.io".to_owned(),
            },
            &clock,
            &repo,
            &mut uow,
        )
        .await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
