//! Authenticated identity attached to protected requests.

/// The stable identity (typically an e-mail) vouched for by the identity
/// provider. Ownership checks compare it against [`super::Link::owner_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
