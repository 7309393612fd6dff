//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so that services never depend on a
//! concrete store. They are implemented in the infrastructure layer by a
//! PostgreSQL backend and an in-memory backend.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage and lookups
//! - [`ClickRepository`] - Click event storage and grouped reads
//! - [`TokenRepository`] - API token authentication
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod click_repository;
pub mod link_repository;
pub mod token_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
