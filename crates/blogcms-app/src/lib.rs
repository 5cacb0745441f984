//! blogcms application wiring.
//!
//! Loads configuration, installs the tracing subscriber, and assembles the
//! repositories, clock, and publisher shared by the bounded contexts.

pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod welcome;
