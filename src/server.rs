//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, cache setup, worker spawning, and Axum server lifecycle.

use crate::api::routes::app_router;
use crate::application::click_worker::run_click_worker;
use crate::application::services::auth_service::hash_token;
use crate::application::services::{ClickRecorder, EventEnricher};
use crate::config::{Config, GeoProvider, StorageBackend};
use crate::domain::enrichment::GeoLocator;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::geo::{HttpGeoLocator, NullGeoLocator};
use crate::infrastructure::memory::InMemoryTokenRepository;
use crate::state::{AppState, Repositories, StateSettings};
use crate::utils::code_generator::RandomCodeGenerator;
use crate::utils::user_agent::HeuristicDeviceClassifier;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// How long shutdown waits for queued clicks to be written.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool plus migrations, or in-memory stores)
/// - Redis cache (or NullCache fallback)
/// - Click enrichment and the background click worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the click queue is closed and drained before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The geolocation client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repositories = build_repositories(&config).await?;
    let cache = build_cache(&config).await;

    let geo: Arc<dyn GeoLocator> = match config.geo_provider {
        GeoProvider::Http => {
            tracing::info!(endpoint = %config.geo_endpoint, "Geolocation enabled");
            Arc::new(
                HttpGeoLocator::new(
                    &config.geo_endpoint,
                    Duration::from_millis(config.enrichment_timeout_ms),
                )
                .context("Failed to build geolocation client")?,
            )
        }
        GeoProvider::Disabled => Arc::new(NullGeoLocator),
    };

    let enricher = Arc::new(EventEnricher::new(
        geo,
        Arc::new(HeuristicDeviceClassifier),
        Duration::from_millis(config.enrichment_timeout_ms),
    ));

    let (click_recorder, click_rx) = ClickRecorder::channel(config.click_queue_capacity);
    let processor = Arc::new(repositories.click_processor(enricher));
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        processor,
        config.click_worker_concurrency,
    ));

    let state = AppState::new(
        &repositories,
        cache,
        click_recorder,
        Arc::new(RandomCodeGenerator::new()),
        StateSettings {
            base_url: config.base_url.clone(),
            token_signing_secret: config.token_signing_secret.clone(),
            link_ttl: chrono::Duration::days(config.link_ttl_days),
        },
    );

    let app =
        NormalizePathLayer::trim_trailing_slash().layer(app_router(state, config.route_limits()));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining click queue");

    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Click worker finished"),
        Ok(Err(e)) => tracing::error!(error = %e, "Click worker panicked"),
        Err(_) => tracing::warn!(
            timeout_secs = WORKER_DRAIN_TIMEOUT.as_secs(),
            "Click worker did not drain in time; remaining clicks are lost"
        ),
    }

    Ok(())
}

async fn build_repositories(config: &Config) -> Result<Repositories> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Ok(Repositories::postgres(Arc::new(pool)))
        }
        StorageBackend::Memory => {
            let tokens = InMemoryTokenRepository::with_hashes(config.dev_api_tokens.iter().map(
                |(token, owner)| (hash_token(&config.token_signing_secret, token), owner.clone()),
            ));
            tracing::warn!(
                tokens = config.dev_api_tokens.len(),
                "Using in-memory storage; data is lost on restart"
            );

            Ok(Repositories::in_memory(tokens))
        }
    }
}

async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
