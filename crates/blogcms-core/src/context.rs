//! Event context.
//!
//! Describes the circumstances an event was recorded under: which subsystem
//! emitted it, who initiated it, and free-form metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// Circumstances under which a domain event was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    /// Emitting subsystem, e.g. `blog.post`. Required and non-blank.
    pub source: String,
    /// Actor that initiated the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiated_by: Option<String>,
    /// Free-form key/value pairs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl EventContext {
    /// Creates a context for the given source.
    ///
    /// A blank source is accepted here and reported by
    /// [`crate::validation::validate_event`].
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            initiated_by: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Context for events recorded while handling `command`: the command's
    /// initiator plus a `command` metadata entry naming its type.
    #[must_use]
    pub fn for_command(source: impl Into<String>, command: &dyn Command) -> Self {
        Self::new(source)
            .with_optional_initiator(command.initiated_by())
            .with_metadata("command", command.command_type())
    }

    /// Sets the initiating actor.
    #[must_use]
    pub fn with_initiator(mut self, initiated_by: impl Into<String>) -> Self {
        self.initiated_by = Some(initiated_by.into());
        self
    }

    /// Sets the initiating actor if one is known.
    #[must_use]
    pub fn with_optional_initiator(mut self, initiated_by: Option<&str>) -> Self {
        self.initiated_by = initiated_by.map(str::to_owned);
        self
    }

    /// Adds one metadata entry, replacing an existing value for the key.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Whether the source is empty or whitespace only.
    #[must_use]
    pub fn has_blank_source(&self) -> bool {
        self.source.trim().is_empty()
    }
}
