//! Link creation and listing service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::application::services::code_allocator::{AllocationError, CodeAllocator};
use crate::domain::entities::{Link, NewLink, Principal};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_validator::validate_original_url;

/// Persistence attempts made for generated codes that lose a write race.
pub const MAX_PERSIST_ATTEMPTS: usize = 3;

/// Service for creating and listing short links on behalf of a principal.
///
/// Code allocation only checks for existing codes, so two concurrent
/// creations can be handed the same candidate. The store's unique constraint
/// settles the race; the loser retries with a fresh code, or fails with a
/// conflict when it asked for a specific alias.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    allocator: CodeAllocator,
    link_ttl: Duration,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>, allocator: CodeAllocator, link_ttl: Duration) -> Self {
        Self {
            links,
            allocator,
            link_ttl,
        }
    }

    /// Creates a short link owned by `principal`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or alias is invalid.
    /// Returns [`AppError::Conflict`] if the custom alias is already taken.
    /// Returns [`AppError::Internal`] if no free code could be persisted, or on
    /// storage errors.
    pub async fn create_link(
        &self,
        principal: &Principal,
        original_url: String,
        custom_alias: Option<String>,
    ) -> Result<Link, AppError> {
        validate_original_url(&original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let custom_alias = custom_alias
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        for attempt in 1..=MAX_PERSIST_ATTEMPTS {
            let code = self.allocator.allocate(custom_alias.as_deref()).await?;

            let new_link = NewLink {
                original_url: original_url.clone(),
                short_code: code.as_str().to_string(),
                custom_alias: custom_alias.clone(),
                owner_id: principal.id.clone(),
                expiry_date: Utc::now() + self.link_ttl,
            };

            match self.links.create(new_link).await {
                Ok(link) => {
                    tracing::info!(
                        link_id = link.id,
                        code = %link.short_code,
                        owner = %link.owner_id,
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) if custom_alias.is_some() => {
                    return Err(AllocationError::AliasConflict {
                        alias: code.into_inner(),
                    }
                    .into());
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(attempt, code = %code, "Short code taken at write time, retrying");
                    metrics::counter!("code_write_conflicts_total").increment(1);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AllocationError::Exhausted {
            attempts: MAX_PERSIST_ATTEMPTS,
        }
        .into())
    }

    /// Lists every link owned by `principal`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_links(&self, principal: &Principal) -> Result<Vec<Link>, AppError> {
        self.links.list_by_owner(&principal.id).await
    }
}
