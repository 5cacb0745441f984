//! blogcms Core: the domain-event and aggregate-root kernel.
//!
//! Aggregates record domain events while their business methods run and
//! never publish them. The persistence side drains the recorded events once
//! per successful save and hands them to a [`publisher::DomainEventPublisher`],
//! either directly ([`persistence::save_and_publish`]) or through an explicit
//! per-request [`unit_of_work::UnitOfWork`].
//!
//! This crate contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod context;
pub mod entity_event;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod persistence;
pub mod publisher;
pub mod record;
pub mod repository;
pub mod unit_of_work;
pub mod validation;
