//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - Process-local repository implementations
//! - [`geo`] - Geolocation providers

pub mod cache;
pub mod geo;
pub mod memory;
pub mod persistence;
