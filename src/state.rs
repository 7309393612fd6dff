//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{
    AnalyticsService, AuthService, ClickProcessor, ClickRecorder, CodeAllocator, EventEnricher,
    LinkService, RedirectService,
};
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::memory::{
    InMemoryClickRepository, InMemoryLinkRepository, InMemoryTokenRepository,
};
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository, PgTokenRepository};
use crate::utils::code_generator::CodeGenerator;

/// The three stores behind the service, sharing one backend.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool.clone())),
            tokens: Arc::new(PgTokenRepository::new(pool)),
        }
    }

    /// Process-local stores; click events reference links in the same table.
    pub fn in_memory(tokens: InMemoryTokenRepository) -> Self {
        let links = Arc::new(InMemoryLinkRepository::new());
        let clicks = Arc::new(InMemoryClickRepository::new(links.clone()));

        Self {
            links,
            clicks,
            tokens: Arc::new(tokens),
        }
    }

    /// Builds the processor that persists queued clicks into these stores.
    pub fn click_processor(&self, enricher: Arc<EventEnricher>) -> ClickProcessor {
        ClickProcessor::new(enricher, self.clicks.clone(), self.links.clone())
    }
}

/// Plain settings the services need besides their collaborators.
#[derive(Debug, Clone)]
pub struct StateSettings {
    /// Public origin used to build `short_url` values.
    pub base_url: String,
    pub token_signing_secret: String,
    pub link_ttl: chrono::Duration,
}

/// Application state shared across all handlers.
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub auth_service: Arc<AuthService>,
    pub click_recorder: ClickRecorder,
    pub cache: Arc<dyn CacheService>,
    pub links: Arc<dyn LinkRepository>,
    pub base_url: String,
}

impl AppState {
    pub fn new(
        repositories: &Repositories,
        cache: Arc<dyn CacheService>,
        click_recorder: ClickRecorder,
        code_generator: Arc<dyn CodeGenerator>,
        settings: StateSettings,
    ) -> Self {
        let allocator = CodeAllocator::new(repositories.links.clone(), code_generator);

        let link_service = Arc::new(LinkService::new(
            repositories.links.clone(),
            allocator,
            settings.link_ttl,
        ));
        let redirect_service = Arc::new(RedirectService::new(
            repositories.links.clone(),
            cache.clone(),
            click_recorder.clone(),
        ));
        let analytics_service = Arc::new(AnalyticsService::new(
            repositories.links.clone(),
            repositories.clicks.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            repositories.tokens.clone(),
            settings.token_signing_secret,
        ));

        Self {
            link_service,
            redirect_service,
            analytics_service,
            auth_service,
            click_recorder,
            cache,
            links: repositories.links.clone(),
            base_url: settings.base_url,
        }
    }
}
