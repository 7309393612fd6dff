//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures with no knowledge of storage or HTTP.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to an original URL
//! - [`Click`] - An enriched click event on a link
//! - [`DeviceType`] - Device class taxonomy used by enrichment
//! - [`AnalyticsSummary`] - Per-link click totals by country and device
//! - [`Principal`] - The authenticated identity behind a request
//!
//! Creation inputs (`NewLink`, `NewClick`) are separate from the stored entities,
//! which carry store-assigned ids.

pub mod click;
pub mod device;
pub mod link;
pub mod principal;
pub mod summary;

pub use click::{Click, NewClick, UNKNOWN};
pub use device::DeviceType;
pub use link::{Link, NewLink};
pub use principal::Principal;
pub use summary::{AnalyticsSummary, DimensionCount};
