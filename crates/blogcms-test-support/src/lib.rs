//! Shared test doubles for the blogcms workspace.

mod clock;
mod publisher;
mod repository;

pub use clock::{FixedClock, fixed_now};
pub use publisher::{FailingEventPublisher, RecordingEventPublisher};
pub use repository::FailingRepository;
