//! Domain layer for the Member context.

pub mod aggregates;
pub mod commands;
pub mod events;
