//! blogcms: media file bounded context.
//!
//! Uploaded images and attachments, identified by a SHA-256 checksum of
//! their bytes and optionally attached to a post. Handlers in this context
//! publish directly after each save instead of going through a unit of work.

pub mod application;
pub mod domain;
