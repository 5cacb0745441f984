//! Application layer for the media context.

pub mod command_handlers;
pub mod query_handlers;
