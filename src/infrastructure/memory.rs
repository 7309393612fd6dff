//! Process-local repository implementations.
//!
//! Used by `STORAGE_BACKEND=memory` and by the HTTP integration tests. Each
//! repository guards its state with a mutex and enforces the same uniqueness
//! and referential rules as the PostgreSQL schema. Nothing survives a restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::domain::entities::{Click, DeviceType, DimensionCount, Link, NewClick, NewLink};
use crate::domain::repositories::{ApiToken, ClickRepository, LinkRepository, TokenRepository};
use crate::error::AppError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::internal("Storage lock poisoned", json!({})))
}

#[derive(Default)]
struct LinkTable {
    next_id: i64,
    by_id: BTreeMap<i64, Link>,
    by_code: HashMap<String, i64>,
}

/// In-memory link store keyed by id with a short code index.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    table: Mutex<LinkTable>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn contains(&self, link_id: i64) -> Result<bool, AppError> {
        Ok(lock(&self.table)?.by_id.contains_key(&link_id))
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut table = lock(&self.table)?;

        // custom_alias always equals short_code, so one index covers both
        if table.by_code.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_link.short_code }),
            ));
        }

        table.next_id += 1;
        let id = table.next_id;
        let link = new_link.into_link(id, Utc::now());

        table.by_code.insert(link.short_code.clone(), id);
        table.by_id.insert(id, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let table = lock(&self.table)?;
        Ok(table
            .by_code
            .get(code)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(lock(&self.table)?.by_id.get(&id).cloned())
    }

    async fn exists_by_code_or_alias(&self, candidate: &str) -> Result<bool, AppError> {
        Ok(lock(&self.table)?.by_code.contains_key(candidate))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        let table = lock(&self.table)?;
        // ids grow with creation time
        Ok(table
            .by_id
            .values()
            .rev()
            .filter(|l| l.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn increment_click_count(&self, link_id: i64) -> Result<(), AppError> {
        let mut table = lock(&self.table)?;
        match table.by_id.get_mut(&link_id) {
            Some(link) => {
                link.click_count += 1;
                Ok(())
            }
            None => Err(AppError::not_found(
                "Link not found",
                json!({ "id": link_id }),
            )),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        lock(&self.table).map(|_| ())
    }
}

/// In-memory click store that rejects events for unknown links.
pub struct InMemoryClickRepository {
    links: Arc<InMemoryLinkRepository>,
    clicks: Mutex<Vec<Click>>,
}

impl InMemoryClickRepository {
    pub fn new(links: Arc<InMemoryLinkRepository>) -> Self {
        Self {
            links,
            clicks: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn record(&self, click: NewClick) -> Result<Click, AppError> {
        if !self.links.contains(click.link_id)? {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": click.link_id }),
            ));
        }

        let mut clicks = lock(&self.clicks)?;
        let id = clicks.len() as i64 + 1;
        let click = click.into_click(id);
        clicks.push(click.clone());

        Ok(click)
    }

    async fn list_by_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let clicks = lock(&self.clicks)?;

        let mut items: Vec<Click> = clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));

        Ok(items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError> {
        let clicks = lock(&self.clicks)?;
        Ok(clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }

    async fn count_by_dimensions(&self, link_id: i64) -> Result<Vec<DimensionCount>, AppError> {
        let clicks = lock(&self.clicks)?;

        let mut groups: BTreeMap<(Option<String>, DeviceType), i64> = BTreeMap::new();
        for click in clicks.iter().filter(|c| c.link_id == link_id) {
            *groups
                .entry((click.country.clone(), click.device_type))
                .or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((country, device_type), count)| DimensionCount {
                country,
                device_type,
                count,
            })
            .collect())
    }
}

/// In-memory token store.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from `(token_hash, owner_id)` pairs.
    pub fn with_hashes(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let now = Utc::now();
        let tokens = entries
            .into_iter()
            .enumerate()
            .map(|(i, (token_hash, owner_id))| ApiToken {
                id: i as i64 + 1,
                name: format!("seed-{}", i + 1),
                owner_id,
                token_hash,
                created_at: now,
                revoked_at: None,
            })
            .collect();

        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_active_owner(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        let tokens = lock(&self.tokens)?;
        Ok(tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.is_active())
            .map(|t| t.owner_id.clone()))
    }

    async fn update_last_used(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        owner_id: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut tokens = lock(&self.tokens)?;

        if tokens
            .iter()
            .any(|t| t.name == name || t.token_hash == token_hash)
        {
            return Err(AppError::conflict(
                "Token already exists",
                json!({ "name": name }),
            ));
        }

        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            revoked_at: None,
        };
        tokens.push(token.clone());

        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let tokens = lock(&self.tokens)?;
        Ok(tokens.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let tokens = lock(&self.tokens)?;
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = lock(&self.tokens)?;
        Ok(tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = lock(&self.tokens)?;
        if let Some(token) = tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}
