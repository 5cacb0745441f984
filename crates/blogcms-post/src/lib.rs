//! blogcms: Post bounded context.
//!
//! Responsible for authoring blog posts and moving them through their
//! editorial lifecycle: draft, published, archived, deleted.

pub mod application;
pub mod domain;
