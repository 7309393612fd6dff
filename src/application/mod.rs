//! Application layer orchestrating domain operations.
//!
//! Services consume repository and collaborator traits and expose the
//! operations the HTTP layer calls.
//!
//! # Available Services
//!
//! - [`services::LinkService`] - Link creation and listing
//! - [`services::CodeAllocator`] - Collision-free short code allocation
//! - [`services::RedirectService`] - Short code resolution with click dispatch
//! - [`services::EventEnricher`] - Best-effort geolocation and device classification
//! - [`services::ClickRecorder`] / [`services::ClickProcessor`] - Decoupled click recording
//! - [`services::AnalyticsService`] - Owner-only analytics reads
//! - [`services::AuthService`] - Bearer token to principal resolution
//!
//! [`click_worker`] hosts the queue consumer spawned at startup.

pub mod click_worker;
pub mod services;
