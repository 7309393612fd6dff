#![allow(dead_code)]

use async_trait::async_trait;
use axum::Extension;
use axum::extract::ConnectInfo;
use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use shortlink_analytics::api::middleware::rate_limit::RateLimit;
use shortlink_analytics::api::routes::{RouteLimits, app_router};
use shortlink_analytics::application::click_worker::run_click_worker;
use shortlink_analytics::application::services::auth_service::hash_token;
use shortlink_analytics::application::services::{ClickRecorder, EventEnricher};
use shortlink_analytics::domain::click_context::PendingClick;
use shortlink_analytics::domain::enrichment::{EnrichmentDegraded, GeoLocation, GeoLocator};
use shortlink_analytics::domain::repositories::{ClickRepository, LinkRepository};
use shortlink_analytics::infrastructure::cache::NullCache;
use shortlink_analytics::infrastructure::geo::NullGeoLocator;
use shortlink_analytics::infrastructure::memory::InMemoryTokenRepository;
use shortlink_analytics::state::{AppState, Repositories, StateSettings};
use shortlink_analytics::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use shortlink_analytics::utils::user_agent::HeuristicDeviceClassifier;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://s.example.com";

pub const OWNER_TOKEN: &str = "test-token";
pub const OWNER: &str = "a@x.com";
pub const OTHER_TOKEN: &str = "other-token";
pub const OTHER: &str = "b@x.com";

const GENEROUS_LIMIT: RateLimit = RateLimit {
    replenish_seconds: 1,
    burst: 100_000,
};

pub const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Geolocation that always answers with the same place.
pub struct StaticGeoLocator {
    pub country: &'static str,
    pub city: &'static str,
}

#[async_trait]
impl GeoLocator for StaticGeoLocator {
    async fn lookup(&self, _ip: IpAddr) -> Result<GeoLocation, EnrichmentDegraded> {
        Ok(GeoLocation {
            country: Some(self.country.to_string()),
            city: Some(self.city.to_string()),
        })
    }
}

/// Geolocation that always fails.
pub struct FailingGeoLocator;

#[async_trait]
impl GeoLocator for FailingGeoLocator {
    async fn lookup(&self, _ip: IpAddr) -> Result<GeoLocation, EnrichmentDegraded> {
        Err(EnrichmentDegraded::Lookup("provider unavailable".to_string()))
    }
}

/// Geolocation that answers only after `delay`.
pub struct SlowGeoLocator {
    pub delay: Duration,
}

#[async_trait]
impl GeoLocator for SlowGeoLocator {
    async fn lookup(&self, _ip: IpAddr) -> Result<GeoLocation, EnrichmentDegraded> {
        tokio::time::sleep(self.delay).await;
        Ok(GeoLocation {
            country: Some("Slowland".to_string()),
            city: None,
        })
    }
}

/// Generator that hands out a fixed sequence, then repeats the last code.
pub struct SequenceCodeGenerator {
    codes: std::sync::Mutex<Vec<&'static str>>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: Vec<&'static str>) -> Self {
        let mut codes = codes;
        codes.reverse();
        Self {
            codes: std::sync::Mutex::new(codes),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        let mut codes = self.codes.lock().unwrap();
        if codes.len() > 1 {
            codes.pop().unwrap().to_string()
        } else {
            codes.last().unwrap().to_string()
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repositories: Repositories,
    pub worker: Option<JoinHandle<()>>,
    /// Unconsumed queue when built [`TestAppBuilder::without_worker`].
    pub pending: Option<mpsc::Receiver<PendingClick>>,
}

pub struct TestAppBuilder {
    geo: Arc<dyn GeoLocator>,
    generator: Arc<dyn CodeGenerator>,
    queue_capacity: usize,
    enrichment_timeout: Duration,
    spawn_worker: bool,
    limits: RouteLimits,
    peer: SocketAddr,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            geo: Arc::new(NullGeoLocator),
            generator: Arc::new(RandomCodeGenerator::new()),
            queue_capacity: 1000,
            enrichment_timeout: Duration::from_millis(500),
            spawn_worker: true,
            limits: RouteLimits {
                public: GENEROUS_LIMIT,
                protected: GENEROUS_LIMIT,
            },
            peer: SocketAddr::from(([127, 0, 0, 1], 40_000)),
        }
    }

    pub fn geo(mut self, geo: impl GeoLocator + 'static) -> Self {
        self.geo = Arc::new(geo);
        self
    }

    pub fn generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn enrichment_timeout(mut self, timeout: Duration) -> Self {
        self.enrichment_timeout = timeout;
        self
    }

    pub fn limits(mut self, limits: RouteLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Socket address every request appears to come from.
    pub fn peer(mut self, peer: SocketAddr) -> Self {
        self.peer = peer;
        self
    }

    /// Leaves the click queue without a consumer.
    pub fn without_worker(mut self) -> Self {
        self.spawn_worker = false;
        self
    }

    pub fn build(self) -> TestApp {
        let tokens = InMemoryTokenRepository::with_hashes([
            (hash_token(SIGNING_SECRET, OWNER_TOKEN), OWNER.to_string()),
            (hash_token(SIGNING_SECRET, OTHER_TOKEN), OTHER.to_string()),
        ]);
        let repositories = Repositories::in_memory(tokens);

        let enricher = Arc::new(EventEnricher::new(
            self.geo,
            Arc::new(HeuristicDeviceClassifier),
            self.enrichment_timeout,
        ));

        let (recorder, rx) = ClickRecorder::channel(self.queue_capacity);

        let (worker, pending) = if self.spawn_worker {
            let processor = Arc::new(repositories.click_processor(enricher));
            (Some(tokio::spawn(run_click_worker(rx, processor, 4))), None)
        } else {
            (None, Some(rx))
        };

        let state = AppState::new(
            &repositories,
            Arc::new(NullCache::new()),
            recorder,
            self.generator,
            StateSettings {
                base_url: BASE_URL.to_string(),
                token_signing_secret: SIGNING_SECRET.to_string(),
                link_ttl: chrono::Duration::days(365),
            },
        );

        // The per-peer rate limiter reads `ConnectInfo` from request extensions
        // directly, so the mocked peer is inserted there as well.
        let app = app_router(state, self.limits)
            .layer(MockConnectInfo(self.peer))
            .layer(Extension(ConnectInfo(self.peer)));

        TestApp {
            server: TestServer::new(app).unwrap(),
            repositories,
            worker,
            pending,
        }
    }
}

pub fn test_app() -> TestApp {
    TestAppBuilder::new().build()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl TestApp {
    /// Creates a link as `token` and returns the response body.
    pub async fn create_link(&self, token: &str, url: &str, alias: Option<&str>) -> Value {
        let mut body = json!({ "original_url": url });
        if let Some(alias) = alias {
            body["custom_alias"] = json!(alias);
        }

        let response = self
            .server
            .post("/links")
            .add_header("Authorization", bearer(token))
            .json(&body)
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Waits until `expected` clicks for `link_id` are stored.
    pub async fn wait_for_clicks(&self, link_id: i64, expected: i64) {
        for _ in 0..200 {
            let stored = self
                .repositories
                .clicks
                .count_by_link(link_id)
                .await
                .unwrap();
            if stored >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        panic!("expected {} clicks for link {}", expected, link_id);
    }

    /// Waits until the link's `click_count` reaches `expected`.
    pub async fn wait_for_click_count(&self, link_id: i64, expected: i64) {
        for _ in 0..200 {
            let link = self
                .repositories
                .links
                .find_by_id(link_id)
                .await
                .unwrap()
                .unwrap();
            if link.click_count >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        panic!("expected click_count {} for link {}", expected, link_id);
    }
}
