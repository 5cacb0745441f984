//! blogcms: Member bounded context.
//!
//! Registered community members, their display nicknames and roles, and
//! withdrawal from the site.

pub mod application;
pub mod domain;
