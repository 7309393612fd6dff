//! Classification of PostgreSQL constraint violations.

/// Unique constraint guarding `links.short_code`.
pub const LINKS_SHORT_CODE_KEY: &str = "links_short_code_key";

/// Partial unique index guarding `links.custom_alias`.
pub const LINKS_CUSTOM_ALIAS_KEY: &str = "links_custom_alias_key";

/// True when `e` is a unique violation on a link's short code or alias.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(
        db_err.constraint(),
        Some(LINKS_SHORT_CODE_KEY | LINKS_CUSTOM_ALIAS_KEY)
    )
}

/// True when `e` is a foreign key violation (a referenced row is missing).
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
