//! blogcms Store: outbound adapters.
//!
//! An in-memory aggregate repository with optimistic concurrency, and a
//! publisher that writes drained domain events to the tracing pipeline.

pub mod memory_repository;
pub mod tracing_publisher;

pub use memory_repository::InMemoryRepository;
pub use tracing_publisher::TracingEventPublisher;
