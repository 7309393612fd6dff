//! Domain layer containing business entities and collaborator contracts.
//!
//! Independent of storage, HTTP and external providers.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_context`] - Raw click context and the queued click unit
//! - [`enrichment`] - Geolocation and device classification contracts
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler builds a [`click_context::ClickContext`]
//! 2. A [`click_context::PendingClick`] is queued by
//!    [`crate::application::services::ClickRecorder`]
//! 3. [`crate::application::click_worker::run_click_worker`] enriches and persists it
//!    through [`repositories::ClickRepository`]

pub mod click_context;
pub mod enrichment;
pub mod entities;
pub mod repositories;
