//! Owner-only analytics over recorded clicks.

use std::sync::Arc;

use crate::domain::entities::{AnalyticsSummary, Click, Link, Principal};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// A page of raw click events for one link.
#[derive(Debug, Clone)]
pub struct ClickPage {
    pub link: Link,
    pub items: Vec<Click>,
    pub total: i64,
}

/// Read-only queries over recorded clicks.
///
/// Authorization happens here: every query resolves the link first and
/// rejects principals that do not own it. Results are computed on demand and
/// trail concurrent click writes.
pub struct AnalyticsService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Total clicks for a link plus counts by country and by device type.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Forbidden`] if `principal` does not own it.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn summarize(
        &self,
        link_id: i64,
        principal: &Principal,
    ) -> Result<(Link, AnalyticsSummary), AppError> {
        let link = self.owned_link(link_id, principal).await?;
        let counts = self.clicks.count_by_dimensions(link.id).await?;

        let summary = AnalyticsSummary::from_counts(link.id, counts);
        Ok((link, summary))
    }

    /// Raw click events for a link, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::summarize`].
    pub async fn list_events(
        &self,
        link_id: i64,
        principal: &Principal,
        offset: i64,
        limit: i64,
    ) -> Result<ClickPage, AppError> {
        let link = self.owned_link(link_id, principal).await?;

        let total = self.clicks.count_by_link(link.id).await?;
        let items = self.clicks.list_by_link(link.id, offset, limit).await?;

        Ok(ClickPage { link, items, total })
    }

    async fn owned_link(&self, link_id: i64, principal: &Principal) -> Result<Link, AppError> {
        let link = self
            .links
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": link_id })))?;

        if !link.is_owned_by(&principal.id) {
            tracing::warn!(link_id, principal = %principal.id, "Analytics access denied");
            return Err(AppError::forbidden(
                "Link belongs to another owner",
                json!({ "id": link_id }),
            ));
        }

        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DeviceType, DimensionCount, NewClick, NewLink};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use chrono::{Duration, Utc};

    fn link(id: i64, owner: &str) -> Link {
        NewLink {
            original_url: "https://example.com".to_string(),
            short_code: "promo".to_string(),
            custom_alias: Some("promo".to_string()),
            owner_id: owner.to_string(),
            expiry_date: Utc::now() + Duration::days(365),
        }
        .into_link(id, Utc::now())
    }

    fn links_with(link: Link) -> MockLinkRepository {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        links
    }

    #[tokio::test]
    async fn test_summarize_for_owner() {
        let mut clicks = MockClickRepository::new();
        clicks
            .expect_count_by_dimensions()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    DimensionCount {
                        country: Some("Norway".into()),
                        device_type: DeviceType::Mobile,
                        count: 2,
                    },
                    DimensionCount {
                        country: None,
                        device_type: DeviceType::Desktop,
                        count: 1,
                    },
                ])
            });

        let service = AnalyticsService::new(
            Arc::new(links_with(link(1, "a@x.com"))),
            Arc::new(clicks),
        );

        let (link, summary) = service
            .summarize(1, &Principal::new("a@x.com"))
            .await
            .unwrap();

        assert_eq!(link.short_code, "promo");
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_country["Norway"], 2);
        assert_eq!(summary.by_country["Unknown"], 1);
        assert_eq!(summary.by_device_type["Mobile"], 2);
    }

    #[tokio::test]
    async fn test_summarize_non_owner_is_forbidden() {
        let mut clicks = MockClickRepository::new();
        clicks.expect_count_by_dimensions().never();

        let service = AnalyticsService::new(
            Arc::new(links_with(link(1, "a@x.com"))),
            Arc::new(clicks),
        );

        let result = service.summarize(1, &Principal::new("b@x.com")).await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_summarize_missing_link_is_not_found() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().returning(|_| Ok(None));

        let service = AnalyticsService::new(Arc::new(links), Arc::new(MockClickRepository::new()));

        let result = service.summarize(99, &Principal::new("a@x.com")).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_events_pages() {
        let mut clicks = MockClickRepository::new();
        clicks.expect_count_by_link().returning(|_| Ok(30));
        clicks
            .expect_list_by_link()
            .withf(|id, offset, limit| *id == 1 && *offset == 25 && *limit == 25)
            .times(1)
            .returning(|link_id, _, _| {
                Ok(vec![
                    NewClick {
                        link_id,
                        ip_address: "8.8.8.8".into(),
                        user_agent: None,
                        referrer: None,
                        device_type: DeviceType::Unknown,
                        country: None,
                        city: None,
                        clicked_at: Utc::now(),
                    }
                    .into_click(26),
                ])
            });

        let service = AnalyticsService::new(
            Arc::new(links_with(link(1, "a@x.com"))),
            Arc::new(clicks),
        );

        let page = service
            .list_events(1, &Principal::new("a@x.com"), 25, 25)
            .await
            .unwrap();

        assert_eq!(page.total, 30);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.link.id, 1);
    }

    #[tokio::test]
    async fn test_list_events_non_owner_is_forbidden() {
        let mut clicks = MockClickRepository::new();
        clicks.expect_list_by_link().never();

        let service = AnalyticsService::new(
            Arc::new(links_with(link(1, "a@x.com"))),
            Arc::new(clicks),
        );

        let result = service
            .list_events(1, &Principal::new("b@x.com"), 0, 25)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }
}
