mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{
    OTHER, OTHER_TOKEN, OWNER, OWNER_TOKEN, SequenceCodeGenerator, TestAppBuilder, bearer,
    test_app,
};

// ─── POST /links ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_with_generated_code() {
    let app = test_app();

    let body = app
        .create_link(OWNER_TOKEN, "https://example.com/spring-sale", None)
        .await;

    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

    assert_eq!(body["original_url"], "https://example.com/spring-sale");
    assert_eq!(body["owner_id"], OWNER);
    assert_eq!(body["custom_alias"], Value::Null);
    assert_eq!(body["short_url"], format!("https://s.example.com/{}", code));
    assert_eq!(body["click_count"], 0);
    assert_eq!(body["expired"], false);
    assert!(body["id"].as_i64().is_some());
    assert!(body["expiry_date"].is_string());
}

#[tokio::test]
async fn test_create_link_with_custom_alias() {
    let app = test_app();

    let body = app
        .create_link(OWNER_TOKEN, "https://example.com", Some("promo"))
        .await;

    assert_eq!(body["short_code"], "promo");
    assert_eq!(body["custom_alias"], "promo");
}

#[tokio::test]
async fn test_blank_alias_is_treated_as_absent() {
    let app = test_app();

    let body = app
        .create_link(OWNER_TOKEN, "https://example.com", Some("   "))
        .await;

    assert_eq!(body["custom_alias"], Value::Null);
    assert_eq!(body["short_code"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_duplicate_alias_is_conflict() {
    let app = test_app();
    app.create_link(OWNER_TOKEN, "https://example.com/a", Some("promo"))
        .await;

    let response = app
        .server
        .post("/links")
        .add_header("Authorization", bearer(OTHER_TOKEN))
        .json(&json!({ "original_url": "https://example.com/b", "custom_alias": "promo" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["details"]["custom_alias"], "promo");
}

#[tokio::test]
async fn test_alias_colliding_with_generated_code_is_conflict() {
    let app = TestAppBuilder::new()
        .generator(SequenceCodeGenerator::new(vec!["Ab12Cd"]))
        .build();
    app.create_link(OWNER_TOKEN, "https://example.com/a", None)
        .await;

    let response = app
        .server
        .post("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .json(&json!({ "original_url": "https://example.com/b", "custom_alias": "Ab12Cd" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let app = test_app();

    for url in ["not a url", "", "ftp://example.com/file"] {
        let response = app
            .server
            .post("/links")
            .add_header("Authorization", bearer(OWNER_TOKEN))
            .json(&json!({ "original_url": url }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn test_overlong_url_is_rejected() {
    let app = test_app();
    let url = format!("https://example.com/{}", "a".repeat(2100));

    let response = app
        .server
        .post("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .json(&json!({ "original_url": url }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_alias_is_rejected() {
    let app = test_app();
    let too_long = "x".repeat(33);

    for alias in ["ab", "has space", "links", "HEALTH", too_long.as_str()] {
        let response = app
            .server
            .post("/links")
            .add_header("Authorization", bearer(OWNER_TOKEN))
            .json(&json!({ "original_url": "https://example.com", "custom_alias": alias }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let app = test_app();

    let response = app
        .server
        .post("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_generated_code_collision_is_retried() {
    let app = TestAppBuilder::new()
        .generator(SequenceCodeGenerator::new(vec!["aaaaaa", "aaaaaa", "bbbbbb"]))
        .build();

    let first = app
        .create_link(OWNER_TOKEN, "https://example.com/1", None)
        .await;
    let second = app
        .create_link(OWNER_TOKEN, "https://example.com/2", None)
        .await;

    assert_eq!(first["short_code"], "aaaaaa");
    assert_eq!(second["short_code"], "bbbbbb");
}

#[tokio::test]
async fn test_allocation_exhausted_is_server_error() {
    let app = TestAppBuilder::new()
        .generator(SequenceCodeGenerator::new(vec!["aaaaaa"]))
        .build();
    app.create_link(OWNER_TOKEN, "https://example.com/1", None)
        .await;

    let response = app
        .server
        .post("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .json(&json!({ "original_url": "https://example.com/2" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["details"]["reason"], "allocation_exhausted");
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .server
        .post("/links")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .server
        .get("/links")
        .add_header("Authorization", bearer("not-a-real-token"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ─── GET /links ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_returns_only_own_links() {
    let app = test_app();
    app.create_link(OWNER_TOKEN, "https://example.com/1", Some("mine-one"))
        .await;
    app.create_link(OWNER_TOKEN, "https://example.com/2", None)
        .await;
    app.create_link(OTHER_TOKEN, "https://example.com/3", Some("theirs"))
        .await;

    let response = app
        .server
        .get("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);

    let items = body["items"].as_array().unwrap();
    assert!(items.iter().all(|l| l["owner_id"] == OWNER));
    assert!(items.iter().all(|l| l["short_code"] != "theirs"));

    let response = app
        .server
        .get("/links")
        .add_header("Authorization", bearer(OTHER_TOKEN))
        .await;

    let body = response.json::<Value>();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["owner_id"], OTHER);
}

#[tokio::test]
async fn test_list_links_empty() {
    let app = test_app();

    let response = app
        .server
        .get("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "items": [], "total": 0 }));
}

#[tokio::test]
async fn test_create_link_accepts_camel_case_fields() {
    let app = test_app();

    let response = app
        .server
        .post("/links")
        .add_header("Authorization", bearer(OWNER_TOKEN))
        .json(&json!({ "originalUrl": "https://example.com/camel", "customAlias": "camel" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(body["short_code"], "camel");
    assert_eq!(body["original_url"], "https://example.com/camel");
}

#[tokio::test]
async fn test_url_with_control_characters_is_rejected() {
    let app = test_app();

    for url in ["https://example.com/a\nb", "https://example.com/a\r\nX-Injected: 1"] {
        let response = app
            .server
            .post("/links")
            .add_header("Authorization", bearer(OWNER_TOKEN))
            .json(&json!({ "original_url": url, "custom_alias": "crlf" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }

    app.server.get("/crlf").await.assert_status_not_found();
}
