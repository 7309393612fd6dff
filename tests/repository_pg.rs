//! PostgreSQL repository tests.
//!
//! Run against a live database with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use shortlink_analytics::AppError;
use shortlink_analytics::application::services::auth_service::hash_token;
use shortlink_analytics::domain::entities::{DeviceType, NewClick, NewLink};
use shortlink_analytics::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use shortlink_analytics::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgTokenRepository,
};

fn new_link(code: &str, alias: Option<&str>, owner: &str) -> NewLink {
    NewLink {
        original_url: "https://example.com/landing".to_string(),
        short_code: code.to_string(),
        custom_alias: alias.map(str::to_string),
        owner_id: owner.to_string(),
        expiry_date: Utc::now() + Duration::days(365),
    }
}

fn new_click(link_id: i64, country: Option<&str>, device_type: DeviceType) -> NewClick {
    NewClick {
        link_id,
        ip_address: "8.8.8.8".to_string(),
        user_agent: Some("Mozilla/5.0".to_string()),
        referrer: None,
        device_type,
        country: country.map(str::to_string),
        city: None,
        clicked_at: Utc::now(),
    }
}

// ─── Links ───────────────────────────────────────────────────────────────────

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_and_find_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let created = repo
        .create(new_link("abc123", None, "a@x.com"))
        .await
        .unwrap();

    assert_eq!(created.short_code, "abc123");
    assert_eq!(created.click_count, 0);

    let by_code = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(by_code.id, created.id);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.owner_id, "a@x.com");

    assert!(repo.find_by_code("ABC123").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("promo", Some("promo"), "a@x.com"))
        .await
        .unwrap();

    let result = repo.create(new_link("promo", None, "b@x.com")).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_exists_by_code_or_alias(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("launch", Some("launch"), "a@x.com"))
        .await
        .unwrap();

    assert!(repo.exists_by_code_or_alias("launch").await.unwrap());
    assert!(!repo.exists_by_code_or_alias("other").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_list_by_owner(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("own001", None, "a@x.com")).await.unwrap();
    repo.create(new_link("own002", None, "a@x.com")).await.unwrap();
    repo.create(new_link("oth001", None, "b@x.com")).await.unwrap();

    let links = repo.list_by_owner("a@x.com").await.unwrap();

    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.owner_id == "a@x.com"));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_increment_click_count(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.create(new_link("cnt001", None, "a@x.com")).await.unwrap();

    repo.increment_click_count(link.id).await.unwrap();
    repo.increment_click_count(link.id).await.unwrap();

    let stored = repo.find_by_id(link.id).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 2);
    assert!(repo.ping().await.is_ok());
}

// ─── Clicks ──────────────────────────────────────────────────────────────────

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_record_and_list_clicks(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool);
    let link = links.create(new_link("clk001", None, "a@x.com")).await.unwrap();

    let first = clicks
        .record(new_click(link.id, Some("Norway"), DeviceType::Mobile))
        .await
        .unwrap();
    let mut later = new_click(link.id, None, DeviceType::Desktop);
    later.clicked_at = first.clicked_at + Duration::seconds(1);
    let second = clicks.record(later).await.unwrap();

    assert_eq!(clicks.count_by_link(link.id).await.unwrap(), 2);

    let page = clicks.list_by_link(link.id, 0, 10).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, second.id);
    assert_eq!(page[0].country_label(), "Unknown");
    assert_eq!(page[1].device_type, DeviceType::Mobile);

    let page = clicks.list_by_link(link.id, 1, 10).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, first.id);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_record_click_for_missing_link_is_not_found(pool: PgPool) {
    let clicks = PgClickRepository::new(Arc::new(pool));

    let result = clicks
        .record(new_click(424242, None, DeviceType::Unknown))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_count_by_dimensions(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool);
    let link = links.create(new_link("dim001", None, "a@x.com")).await.unwrap();

    for (country, device) in [
        (Some("Norway"), DeviceType::Mobile),
        (Some("Norway"), DeviceType::Mobile),
        (None, DeviceType::Desktop),
    ] {
        clicks
            .record(new_click(link.id, country, device))
            .await
            .unwrap();
    }

    let rows = clicks.count_by_dimensions(link.id).await.unwrap();

    assert_eq!(rows.iter().map(|r| r.count).sum::<i64>(), 3);
    let norway_mobile = rows
        .iter()
        .find(|r| r.country.as_deref() == Some("Norway") && r.device_type == DeviceType::Mobile)
        .unwrap();
    assert_eq!(norway_mobile.count, 2);
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_token_lifecycle(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    let hash = hash_token("secret", "plain-token");

    let token = repo.create_token("ci", "a@x.com", &hash).await.unwrap();
    assert!(token.is_active());

    assert_eq!(
        repo.find_active_owner(&hash).await.unwrap().as_deref(),
        Some("a@x.com")
    );
    assert!(repo.update_last_used(&hash).await.is_ok());
    assert_eq!(repo.find_by_name("ci").await.unwrap().unwrap().id, token.id);

    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_active_owner(&hash).await.unwrap().is_none());
    assert!(!repo.find_by_id(token.id).await.unwrap().unwrap().is_active());
    assert_eq!(repo.list_tokens().await.unwrap().len(), 1);
}
