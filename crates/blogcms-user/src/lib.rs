//! blogcms: user account bounded context.
//!
//! Login accounts: username, e-mail, an already-hashed password, and the
//! account status used to lock or deactivate access.

pub mod application;
pub mod domain;
