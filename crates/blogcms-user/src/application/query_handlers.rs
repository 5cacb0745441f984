//! Query handlers for the user account context.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::error::DomainError;
use blogcms_core::lifecycle::LifecycleState;
use blogcms_core::repository::AggregateRepository;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::{User, UserStatus};

/// Read-only view of a login account. Never exposes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub lifecycle: LifecycleState,
    pub version: i64,
}

/// Retrieves an account by ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no account exists for the ID.
pub async fn get_user_by_id(
    user_id: Uuid,
    now: DateTime<Utc>,
    recency_threshold: Duration,
    repo: &dyn AggregateRepository<User>,
) -> Result<UserView, DomainError> {
    let user = command_handlers::load(user_id, repo).await?;
    Ok(UserView {
        user_id,
        username: user.username().to_owned(),
        email: user.email().to_owned(),
        status: user.status(),
        created_at: user.timestamps().created_at,
        lifecycle: user.lifecycle_state(now, recency_threshold),
        version: user.version(),
    })
}

#[cfg(test)]
mod tests {
    use blogcms_core::unit_of_work::UnitOfWork;
    use blogcms_store::InMemoryRepository;
    use blogcms_test_support::{FixedClock, fixed_now};

    use super::*;
    use crate::application::command_handlers::handle_register_user;
    use crate::domain::commands::RegisterUser;

    #[tokio::test]
    async fn test_get_user_by_id_returns_view_without_hash() {
        // Arrange
        let repo: InMemoryRepository<User> = InMemoryRepository::new();
        let user_id = Uuid::new_v4();
        let mut uow = UnitOfWork::new();
        handle_register_user(
            &RegisterUser {
                correlation_id: Uuid::new_v4(),
                initiated_by: None,
                user_id,
                username: "corro".to_owned(),
                email: "corro@example.org".to_owned(),
                password_hash: "secret-hash".to_owned(),
            },
            &FixedClock::default(),
            &repo,
            &mut uow,
        )
        .await
        .unwrap();

        // Act
        let view = get_user_by_id(user_id, fixed_now(), Duration::hours(24), &repo)
            .await
            .unwrap();

        // Assert
        assert_eq!(view.username, "corro");
        assert_eq!(view.status, UserStatus::Active);
        assert_eq!(view.created_at, fixed_now());
        assert_eq!(view.lifecycle, LifecycleState::RecentlyUpdated);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let repo: InMemoryRepository<User> = InMemoryRepository::new();

        let result = get_user_by_id(Uuid::new_v4(), fixed_now(), Duration::hours(24), &repo).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
