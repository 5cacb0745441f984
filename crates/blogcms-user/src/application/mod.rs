//! Application layer for the user account context.

pub mod command_handlers;
pub mod query_handlers;
