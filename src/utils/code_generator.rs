//! Short code generation and custom alias validation.
//!
//! Generated codes are drawn from a fixed 62-symbol alphabet with a
//! cryptographically strong RNG. The generator is an injected instance so
//! that tests can substitute deterministic sequences.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Symbols used for generated codes: upper and lowercase ASCII letters plus digits.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of every generated code (62^6 ≈ 56.8 billion candidates).
pub const CODE_LENGTH: usize = 6;

const ALIAS_MIN_LEN: usize = 3;
const ALIAS_MAX_LEN: usize = 32;

/// Aliases that would shadow fixed routes.
const RESERVED_ALIASES: &[&str] = &["links", "health", "api"];

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// [`CodeGenerator`] backed by an OS-seeded [`StdRng`].
pub struct RandomCodeGenerator {
    rng: Mutex<StdRng>,
}

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        // A poisoned lock still holds a usable RNG state.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Reason a custom alias was rejected before any store lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AliasRejection {
    #[error("alias must be {ALIAS_MIN_LEN}-{ALIAS_MAX_LEN} characters, got {0}")]
    Length(usize),

    #[error("alias may only contain letters, digits, '-' and '_'")]
    Charset,

    #[error("alias '{0}' is reserved")]
    Reserved(String),
}

/// Validates a caller-chosen alias.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `-`, `_`
/// - Must not be a reserved route segment
///
/// # Errors
///
/// Returns the first [`AliasRejection`] that applies.
pub fn validate_custom_alias(alias: &str) -> Result<(), AliasRejection> {
    let len = alias.chars().count();
    if !(ALIAS_MIN_LEN..=ALIAS_MAX_LEN).contains(&len) {
        return Err(AliasRejection::Length(len));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AliasRejection::Charset);
    }

    if is_reserved(alias) {
        return Err(AliasRejection::Reserved(alias.to_string()));
    }

    Ok(())
}

/// True if `code` would be shadowed by a fixed route segment.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}
