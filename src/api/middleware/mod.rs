//! Request middleware.
//!
//! [`auth`] resolves the caller for protected routes, [`rate_limit`] throttles
//! per peer address and [`tracing`] emits one span per request.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
