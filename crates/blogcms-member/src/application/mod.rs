//! Application layer for the Member context.

pub mod command_handlers;
pub mod query_handlers;
