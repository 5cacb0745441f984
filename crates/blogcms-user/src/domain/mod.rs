//! Domain layer for the user account context.

pub mod aggregates;
pub mod commands;
pub mod events;
