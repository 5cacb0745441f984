//! Command handlers for the Member context.
//!
//! Handlers load the member, run the business method, save, and hand the
//! recorded events to the caller's `UnitOfWork`.

use blogcms_core::aggregate::AggregateRoot;
use blogcms_core::clock::Clock;
use blogcms_core::context::EventContext;
use blogcms_core::error::DomainError;
use blogcms_core::repository::AggregateRepository;
use blogcms_core::unit_of_work::UnitOfWork;
use tracing::info;
use uuid::Uuid;

use crate::domain::aggregates::Member;
use crate::domain::commands::{ChangeNickname, ChangeRole, RegisterMember, WithdrawMember};
use crate::domain::events::MEMBER_EVENT_SOURCE;

/// Outcome of a successful Member command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberCommandResult {
    /// The affected member.
    pub member_id: Uuid,
    /// Stored version after the command.
    pub version: i64,
    /// Events moved into the unit of work.
    pub collected_events: usize,
}

pub(crate) async fn load(
    member_id: Uuid,
    repo: &dyn AggregateRepository<Member>,
) -> Result<Member, DomainError> {
    repo.find_by_id(member_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(member_id))
}

async fn save(
    mut member: Member,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Member>,
    uow: &mut UnitOfWork,
) -> Result<MemberCommandResult, DomainError> {
    let collected_events = uow.save_and_collect(&mut member, repo, clock).await?;
    Ok(MemberCommandResult {
        member_id: member.aggregate_id(),
        version: member.version(),
        collected_events,
    })
}

/// Handles the `RegisterMember` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the member id is already registered
/// or the input is malformed, or the repository error if the save fails.
pub async fn handle_register_member(
    command: &RegisterMember,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Member>,
    uow: &mut UnitOfWork,
) -> Result<MemberCommandResult, DomainError> {
    if repo.find_by_id(command.member_id).await?.is_some() {
        return Err(DomainError::Validation(format!(
            "member {} is already registered",
            command.member_id
        )));
    }
    let member = Member::register(
        command.member_id,
        &command.email,
        &command.nickname,
        command.role,
        command.correlation_id,
        EventContext::for_command(MEMBER_EVENT_SOURCE, command),
        clock,
    )?;
    info!(member_id = %command.member_id, role = %member.role(), "member registered");
    save(member, clock, repo, uow).await
}

/// Handles the `ChangeNickname` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the member does not exist and
/// `DomainError::Validation` if the member has withdrawn or the nickname is
/// invalid.
pub async fn handle_change_nickname(
    command: &ChangeNickname,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Member>,
    uow: &mut UnitOfWork,
) -> Result<MemberCommandResult, DomainError> {
    let mut member = load(command.member_id, repo).await?;
    member.change_nickname(
        &command.nickname,
        command.correlation_id,
        EventContext::for_command(MEMBER_EVENT_SOURCE, command),
        clock,
    )?;
    save(member, clock, repo, uow).await
}

/// Handles the `ChangeRole` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the member does not exist and
/// `DomainError::Validation` if the member has withdrawn.
pub async fn handle_change_role(
    command: &ChangeRole,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Member>,
    uow: &mut UnitOfWork,
) -> Result<MemberCommandResult, DomainError> {
    let mut member = load(command.member_id, repo).await?;
    member.change_role(
        command.role,
        command.correlation_id,
        EventContext::for_command(MEMBER_EVENT_SOURCE, command),
        clock,
    )?;
    info!(member_id = %command.member_id, role = %command.role, "member role changed");
    save(member, clock, repo, uow).await
}

/// Handles the `WithdrawMember` command. The withdrawn member stays stored
/// so that its history can still be queried.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the member does not exist and
/// `DomainError::InvalidStateTransition` if it has already withdrawn.
pub async fn handle_withdraw_member(
    command: &WithdrawMember,
    clock: &dyn Clock,
    repo: &dyn AggregateRepository<Member>,
    uow: &mut UnitOfWork,
) -> Result<MemberCommandResult, DomainError> {
    let mut member = load(command.member_id, repo).await?;
    member.withdraw(
        command.correlation_id,
        EventContext::for_command(MEMBER_EVENT_SOURCE, command),
        clock,
    )?;
    info!(member_id = %command.member_id, "member withdrew");
    save(member, clock, repo, uow).await
}

#[cfg(test)]
mod tests {
    use blogcms_core::entity_event::EntityEventType;
    use blogcms_core::event::DomainEvent;
    use blogcms_store::InMemoryRepository;
    use blogcms_test_support::{FailingEventPublisher, FixedClock, RecordingEventPublisher};

    use super::*;
    use crate::domain::aggregates::{MemberRole, MemberStatus};

    fn register_command(member_id: Uuid) -> RegisterMember {
        RegisterMember {
            correlation_id: Uuid::new_v4(),
            initiated_by: Some("signup-form".to_owned()),
            member_id,
            email: "ferris@example.org".to_owned(),
            nickname: "ferris".to_owned(),
            role: MemberRole::Reader,
        }
    }

    #[tokio::test]
    async fn test_handle_register_member_collects_created_event() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<Member> = InMemoryRepository::new();
        let mut uow = UnitOfWork::new();
        let command = register_command(Uuid::new_v4());

        // Act
        let result = handle_register_member(&command, &clock, &repo, &mut uow)
            .await
            .unwrap();

        // Assert
        assert_eq!(result.version, 1);
        assert_eq!(uow.pending_count(), 1);
        let event = &uow.pending()[0];
        assert_eq!(event.event_type(), EntityEventType::Created.as_str());
        assert_eq!(event.correlation_id(), Some(command.correlation_id));
        assert_eq!(
            event.event_context().unwrap().initiated_by.as_deref(),
            Some("signup-form")
        );
    }

    #[tokio::test]
    async fn test_handle_register_member_rejects_duplicate_id() {
        let clock = FixedClock::default();
        let repo: InMemoryRepository<Member> = InMemoryRepository::new();
        let member_id = Uuid::new_v4();
        let mut uow = UnitOfWork::new();
        handle_register_member(&register_command(member_id), &clock, &repo, &mut uow)
            .await
            .unwrap();

        let mut second = UnitOfWork::new();
        let result =
            handle_register_member(&register_command(member_id), &clock, &repo, &mut second).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_one_unit_of_work_spans_several_commands() {
        // Arrange
        let clock = FixedClock::default();
        let repo: InMemoryRepository<Member> = InMemoryRepository::new();
        let publisher = RecordingEventPublisher::new();
        let member_id = Uuid::new_v4();
        let mut uow = UnitOfWork::new();
        let correlation_id = Uuid::new_v4();

        // Act
        handle_register_member(&register_command(member_id), &clock, &repo, &mut uow)
            .await
            .unwrap();
        handle_change_role(
            &ChangeRole {
                correlation_id,
                initiated_by: Some("admin".to_owned()),
                member_id,
                role: MemberRole::Writer,
            },
            &clock,
            &repo,
            &mut uow,
        )
        .await
        .unwrap();
        handle_withdraw_member(
            &WithdrawMember {
                correlation_id,
                initiated_by: None,
                member_id,
            },
            &clock,
            &repo,
            &mut uow,
        )
        .await
        .unwrap();
        let published = uow.commit(&publisher).await.unwrap();

        // Assert
        assert_eq!(published, 4);
        assert_eq!(
            publisher.published_types(),
            vec![
                "EntityCreated",
                "EntityStateChanged",
                "EntityStateChanged",
                "EntityDeleted"
            ]
        );
        assert!(uow.get_domain_events_and_clear().is_empty());

        let stored = load(member_id, &repo).await.unwrap();
        assert_eq!(stored.status(), MemberStatus::Withdrawn);
        assert_eq!(stored.role(), MemberRole::Writer);
        assert_eq!(stored.version(), 3);
    }

    #[tokio::test]
    async fn test_commit_with_failing_publisher_still_drains() {
        let clock = FixedClock::default();
        let repo: InMemoryRepository<Member> = InMemoryRepository::new();
        let mut uow = UnitOfWork::new();
        handle_register_member(&register_command(Uuid::new_v4()), &clock, &repo, &mut uow)
            .await
            .unwrap();

        let result = uow.commit(&FailingEventPublisher).await;

        assert!(matches!(result, Err(DomainError::Publish { .. })));
        assert!(uow.is_empty());
    }

    #[tokio::test]
    async fn test_handle_change_nickname_unknown_member() {
        let clock = FixedClock::default();
        let repo: InMemoryRepository<Member> = InMemoryRepository::new();
        let mut uow = UnitOfWork::new();
        let command = ChangeNickname {
            correlation_id: Uuid::new_v4(),
            initiated_by: None,
            member_id: Uuid::new_v4(),
            nickname: "crab".to_owned(),
        };

        let result = handle_change_nickname(&command, &clock, &repo, &mut uow).await;

        assert!(matches!(result, Err(DomainError::AggregateNotFound(_))));
    }
}
