//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by an externally authenticated identity.
///
/// Immutable after creation apart from `click_count`, which trails the recorded
/// click events and is only ever incremented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    /// Present only when the owner picked the code; always equal to `short_code`.
    pub custom_alias: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub click_count: i64,
}

impl Link {
    /// Returns true if the owner is the given identity.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Returns true once `expiry_date` has passed.
    ///
    /// Informational only: resolution does not consult it.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expiry_date
    }
}

/// Input data for persisting a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub owner_id: String,
    pub expiry_date: DateTime<Utc>,
}

impl NewLink {
    /// Materializes the stored link once the store has assigned an id.
    pub fn into_link(self, id: i64, created_at: DateTime<Utc>) -> Link {
        Link {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            custom_alias: self.custom_alias,
            owner_id: self.owner_id,
            created_at,
            expiry_date: self.expiry_date,
            click_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_link(expiry_date: DateTime<Utc>) -> NewLink {
        NewLink {
            original_url: "https://example.com".to_string(),
            short_code: "promo".to_string(),
            custom_alias: Some("promo".to_string()),
            owner_id: "a@x.com".to_string(),
            expiry_date,
        }
    }

    #[test]
    fn test_into_link_starts_with_zero_clicks() {
        let now = Utc::now();
        let link = new_link(now + Duration::days(365)).into_link(7, now);

        assert_eq!(link.id, 7);
        assert_eq!(link.short_code, "promo");
        assert_eq!(link.custom_alias.as_deref(), Some("promo"));
        assert_eq!(link.created_at, now);
        assert_eq!(link.click_count, 0);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_link_ownership() {
        let link = new_link(Utc::now()).into_link(1, Utc::now());

        assert!(link.is_owned_by("a@x.com"));
        assert!(!link.is_owned_by("b@x.com"));
    }

    #[test]
    fn test_link_is_expired() {
        let link = new_link(Utc::now() - Duration::seconds(1)).into_link(1, Utc::now());
        assert!(link.is_expired());
    }
}
