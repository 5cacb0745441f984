//! Application error types.

use blogcms_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the blogcms process.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command or query failed in a bounded context.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
