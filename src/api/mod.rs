//! HTTP surface of the service.
//!
//! Public routes (`GET /{code}`, `GET /health`) need no credentials. Link
//! management and analytics routes sit behind bearer token authentication
//! and are scoped to the caller's own links.
//!
//! - [`dto`] - Request and response bodies
//! - [`handlers`] - One handler per endpoint
//! - [`middleware`] - Authentication, rate limiting and request tracing
//! - [`routes`] - Router assembly

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
