//! Collision-free short code allocation.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    AliasRejection, CodeGenerator, is_reserved, validate_custom_alias,
};

/// Candidates tried before allocation gives up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;

/// A short code that was free at allocation time.
///
/// Freedom is only advisory: the store's unique constraint is the final word,
/// so callers must still handle a write-time conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortCode(String);

impl ShortCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("alias '{alias}' is already taken")]
    AliasConflict { alias: String },

    #[error("invalid alias: {0}")]
    InvalidAlias(#[from] AliasRejection),

    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<AllocationError> for AppError {
    fn from(e: AllocationError) -> Self {
        match e {
            AllocationError::AliasConflict { alias } => AppError::conflict(
                "Custom alias already exists",
                json!({ "custom_alias": alias }),
            ),
            AllocationError::InvalidAlias(rejection) => AppError::bad_request(
                "Invalid custom alias",
                json!({ "reason": rejection.to_string() }),
            ),
            AllocationError::Exhausted { attempts } => AppError::internal(
                "Failed to allocate a unique short code",
                json!({ "reason": "allocation_exhausted", "attempts": attempts }),
            ),
            AllocationError::Store(inner) => inner,
        }
    }
}

/// Produces short codes that are not yet used by any link.
pub struct CodeAllocator {
    links: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl CodeAllocator {
    pub fn new(links: Arc<dyn LinkRepository>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            links,
            generator,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// Allocates `custom_alias` verbatim, or a fresh random code when absent.
    ///
    /// An empty or whitespace-only alias counts as absent.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidAlias`] if the alias breaks the alias rules
    /// - [`AllocationError::AliasConflict`] if the alias is already a code or alias
    /// - [`AllocationError::Exhausted`] if every generated candidate collided
    /// - [`AllocationError::Store`] on storage errors
    pub async fn allocate(&self, custom_alias: Option<&str>) -> Result<ShortCode, AllocationError> {
        match custom_alias.map(str::trim).filter(|a| !a.is_empty()) {
            Some(alias) => self.claim_alias(alias).await,
            None => self.generate_free().await,
        }
    }

    async fn claim_alias(&self, alias: &str) -> Result<ShortCode, AllocationError> {
        validate_custom_alias(alias)?;

        if self.links.exists_by_code_or_alias(alias).await? {
            return Err(AllocationError::AliasConflict {
                alias: alias.to_string(),
            });
        }

        Ok(ShortCode(alias.to_string()))
    }

    async fn generate_free(&self) -> Result<ShortCode, AllocationError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if is_reserved(&candidate) {
                tracing::debug!(attempt, code = %candidate, "Generated code is reserved");
                continue;
            }

            if !self.links.exists_by_code_or_alias(&candidate).await? {
                return Ok(ShortCode(candidate));
            }

            tracing::debug!(attempt, code = %candidate, "Generated code collided");
        }

        tracing::error!(attempts = self.max_attempts, "Short code allocation exhausted");
        metrics::counter!("code_allocation_exhausted_total").increment(1);

        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
