//! Structural event validation.
//!
//! This is a reporting utility. Nothing in the kernel calls it implicitly;
//! recording an invalid event into an aggregate is allowed.

use crate::event::DomainEvent;

/// Checks an event's structure and returns one description per violation.
/// An empty vector means the event is structurally valid.
///
/// Checked rules:
/// * `event_version` is at least 1,
/// * the event context's `source` is not blank (events without a context
///   skip this rule),
/// * the event is not its own cause.
#[must_use]
pub fn validate_event(event: &dyn DomainEvent) -> Vec<String> {
    let mut violations = Vec::new();

    if event.event_version() < 1 {
        violations.push(format!(
            "event version must be at least 1, got {}",
            event.event_version()
        ));
    }

    if let Some(context) = event.event_context() {
        if context.has_blank_source() {
            violations.push("event context source must not be blank".to_owned());
        }
    }

    if event.causation_id() == Some(event.event_id()) {
        violations.push(format!(
            "event {} cannot cause itself: causation id equals event id",
            event.event_id()
        ));
    }

    violations
}

/// Whether [`validate_event`] reports no violations.
#[must_use]
pub fn is_valid_event(event: &dyn DomainEvent) -> bool {
    validate_event(event).is_empty()
}
