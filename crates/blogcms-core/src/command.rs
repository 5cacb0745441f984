//! Command abstractions.

use uuid::Uuid;

/// Trait that all application commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID shared by every event the command causes.
    fn correlation_id(&self) -> Uuid;

    /// The actor issuing the command, if known.
    fn initiated_by(&self) -> Option<&str> {
        None
    }
}
