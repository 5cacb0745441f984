//! Domain layer for the media context.

pub mod aggregates;
pub mod commands;
pub mod events;
