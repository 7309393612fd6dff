//! Repository trait for click event storage and analytics reads.

use crate::domain::entities::{Click, DimensionCount, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recorded click events.
///
/// Events are append-only. Every event references an existing link.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryClickRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends an enriched click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `link_id` references no link.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record(&self, click: NewClick) -> Result<Click, AppError>;

    /// Lists events for a link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_by_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError>;

    /// Counts events recorded for a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError>;

    /// Counts events for a link grouped by (country, device type).
    ///
    /// Produced by a single read so that derived totals agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_by_dimensions(&self, link_id: i64) -> Result<Vec<DimensionCount>, AppError>;
}
