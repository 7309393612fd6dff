//! Short code resolution on the redirect path.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::click_recorder::ClickRecorder;
use crate::domain::click_context::ClickContext;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CachedLink};

/// Where a resolved short code sends the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub link_id: i64,
    pub original_url: String,
}

impl From<CachedLink> for RedirectTarget {
    fn from(cached: CachedLink) -> Self {
        Self {
            link_id: cached.link_id,
            original_url: cached.original_url,
        }
    }
}

/// Resolves short codes and dispatches click recording.
///
/// Resolution never waits on enrichment or analytics writes: the click is
/// handed to [`ClickRecorder`] with a non-blocking send. Expiry is not
/// checked; expired links keep redirecting.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    recorder: ClickRecorder,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        recorder: ClickRecorder,
    ) -> Self {
        Self {
            links,
            cache,
            recorder,
        }
    }

    /// Resolves `code` and queues exactly one click for it.
    ///
    /// # Cache Strategy
    ///
    /// - **Hit**: redirect straight from cache
    /// - **Miss**: read the store, populate the cache on a detached task
    /// - **Cache error**: logged, then treated as a miss
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code; no click is queued.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(
        &self,
        code: &str,
        context: ClickContext,
    ) -> Result<RedirectTarget, AppError> {
        let target = match self.cache.get_link(code).await {
            Ok(Some(cached)) => cached.into(),
            Ok(None) => self.resolve_from_store(code).await?,
            Err(e) => {
                tracing::warn!(code, error = %e, "Cache read failed, falling back to store");
                self.resolve_from_store(code).await?
            }
        };

        self.recorder.record(target.link_id, context);

        Ok(target)
    }

    async fn resolve_from_store(&self, code: &str) -> Result<RedirectTarget, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        let cached = CachedLink {
            link_id: link.id,
            original_url: link.original_url,
        };

        let cache = Arc::clone(&self.cache);
        let key = code.to_string();
        let entry = cached.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_link(&key, &entry, None).await {
                tracing::warn!(code = %key, error = %e, "Failed to cache link");
            }
        });

        Ok(cached.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Link, NewLink};
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache};
    use chrono::{Duration, Utc};

    fn link(id: i64, code: &str) -> Link {
        NewLink {
            original_url: "https://example.com".to_string(),
            short_code: code.to_string(),
            custom_alias: None,
            owner_id: "a@x.com".to_string(),
            expiry_date: Utc::now() + Duration::days(365),
        }
        .into_link(id, Utc::now())
    }

    fn context() -> ClickContext {
        ClickContext::new("8.8.8.8".to_string(), Some("Mozilla/5.0"), None)
    }

    #[tokio::test]
    async fn test_resolve_found_dispatches_one_click() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_code()
            .withf(|c| c == "promo")
            .times(1)
            .returning(|c| Ok(Some(link(9, c))));

        let (recorder, mut rx) = ClickRecorder::channel(8);
        let service = RedirectService::new(Arc::new(links), Arc::new(NullCache::new()), recorder);

        let target = service.resolve("promo", context()).await.unwrap();

        assert_eq!(target.link_id, 9);
        assert_eq!(target.original_url, "https://example.com");

        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.link_id, 9);
        assert_eq!(queued.context.ip_address, "8.8.8.8");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_is_not_found_without_click() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(|_| Ok(None));

        let (recorder, mut rx) = ClickRecorder::channel(8);
        let service = RedirectService::new(Arc::new(links), Arc::new(NullCache::new()), recorder);

        let result = service.resolve("nope00", context()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().never();

        let mut cache = MockCacheService::new();
        cache.expect_get_link().times(1).returning(|_| {
            Ok(Some(CachedLink {
                link_id: 3,
                original_url: "https://cached.example".to_string(),
            }))
        });

        let (recorder, mut rx) = ClickRecorder::channel(8);
        let service = RedirectService::new(Arc::new(links), Arc::new(cache), recorder);

        let target = service.resolve("abc123", context()).await.unwrap();

        assert_eq!(target.original_url, "https://cached.example");
        assert_eq!(rx.try_recv().unwrap().link_id, 3);
    }

    #[tokio::test]
    async fn test_cache_error_falls_back_to_store() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_code()
            .times(1)
            .returning(|c| Ok(Some(link(5, c))));

        let mut cache = MockCacheService::new();
        cache
            .expect_get_link()
            .returning(|_| Err(CacheError::OperationError("down".into())));
        cache.expect_set_link().returning(|_, _, _| Ok(()));

        let (recorder, _rx) = ClickRecorder::channel(8);
        let service = RedirectService::new(Arc::new(links), Arc::new(cache), recorder);

        let target = service.resolve("abc123", context()).await.unwrap();

        assert_eq!(target.link_id, 5);
    }

    #[tokio::test]
    async fn test_full_queue_does_not_fail_redirect() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().returning(|c| Ok(Some(link(1, c))));

        let (recorder, _rx) = ClickRecorder::channel(1);
        let service = RedirectService::new(Arc::new(links), Arc::new(NullCache::new()), recorder);

        for _ in 0..3 {
            assert!(service.resolve("abc123", context()).await.is_ok());
        }
    }
}
