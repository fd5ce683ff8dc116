mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat};
use serde_json::{Value, json};
use std::future::IntoFuture;

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_generates_code() {
    let app = common::test_app();
    let (user, token) = app.login_as("intern@dacoid.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "originalUrl": "https://example.com/some/long/path" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    let code = body["shortUrl"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_eq!(body["originalUrl"], "https://example.com/some/long/path");
    assert_eq!(body["userId"], user.id);
    assert!(body["customAlias"].is_null());
    assert!(body["expiresAt"].is_null());
}

#[tokio::test]
async fn test_create_link_with_alias_and_expiry() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;
    let expires_at = (app.clock_now() + Duration::days(7)).to_rfc3339_opts(SecondsFormat::Secs, true);

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({
            "originalUrl": "https://example.com",
            "customAlias": "my-link",
            "expiresAt": expires_at
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["shortUrl"], "my-link");
    assert_eq!(body["customAlias"], "my-link");
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn test_create_link_empty_optionals_are_ignored() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({
            "originalUrl": "https://example.com",
            "customAlias": "",
            "expiresAt": ""
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["customAlias"].is_null());
    assert_eq!(body["shortUrl"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_link_missing_url() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Original URL is required");
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    for url in ["not a url", "ftp://example.com/file", "javascript:alert(1)"] {
        let response = app
            .server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&json!({ "originalUrl": url }))
            .await;

        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_create_link_past_expiry() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;
    let expires_at = (app.clock_now() - Duration::hours(1)).to_rfc3339();

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "originalUrl": "https://example.com", "expiresAt": expires_at }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(
        body["error"]["message"],
        "Expiration date must be in the future"
    );
}

#[tokio::test]
async fn test_create_link_unparseable_expiry() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "originalUrl": "https://example.com", "expiresAt": "next tuesday" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid expiration date format");
}

#[tokio::test]
async fn test_create_link_invalid_alias() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    for alias in ["ab", "has space", "api"] {
        let response = app
            .server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&json!({ "originalUrl": "https://example.com", "customAlias": alias }))
            .await;

        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_create_link_taken_alias() {
    let app = common::test_app();
    let (owner, _) = app.login_as("first@example.com").await;
    let (_, token) = app.login_as("second@example.com").await;
    app.create_link(&owner, "taken", "https://example.com/a", None)
        .await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "originalUrl": "https://example.com/b", "customAlias": "taken" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Custom alias is already taken");
}

#[tokio::test]
async fn test_concurrent_alias_creation_has_one_winner() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;
    let body = json!({ "originalUrl": "https://example.com", "customAlias": "race" });

    let (a, b, c) = tokio::join!(
        app.server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&body)
            .into_future(),
        app.server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&body)
            .into_future(),
        app.server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&body)
            .into_future(),
    );

    let statuses = [a.status_code(), b.status_code(), c.status_code()];
    let created = statuses
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    let rejected = statuses
        .iter()
        .filter(|s| **s == StatusCode::BAD_REQUEST)
        .count();

    assert_eq!(created, 1);
    assert_eq!(rejected, 2);
}

#[tokio::test]
async fn test_create_link_malformed_json() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    let response = app
        .server
        .post("/api/links")
        .authorization_bearer(&token)
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_only_own_newest_first() {
    let app = common::test_app();
    let (user, token) = app.login_as("intern@dacoid.com").await;
    let (other, _) = app.login_as("other@example.com").await;

    app.create_link(&user, "first1", "https://example.com/1", None)
        .await;
    app.clock.advance(Duration::seconds(1));
    let second = app
        .create_link(&user, "second", "https://example.com/2", None)
        .await;
    app.create_link(&other, "theirs", "https://example.com/3", None)
        .await;
    app.add_click(&second, None, None, app.clock_now()).await;
    app.add_click(&second, None, None, app.clock_now()).await;

    let response = app
        .server
        .get("/api/links")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["total"], 2);
    assert_eq!(body["pages"], 1);
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["shortUrl"], "second");
    assert_eq!(links[0]["clickCount"], 2);
    assert_eq!(links[1]["shortUrl"], "first1");
    assert_eq!(links[1]["clickCount"], 0);
}

#[tokio::test]
async fn test_list_links_pagination() {
    let app = common::test_app();
    let (user, token) = app.login_as("intern@dacoid.com").await;

    for i in 0..5 {
        app.create_link(&user, &format!("code{i:02}"), "https://example.com", None)
            .await;
        app.clock.advance(Duration::seconds(1));
    }

    let response = app
        .server
        .get("/api/links")
        .add_query_param("page", 2)
        .add_query_param("limit", 2)
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["total"], 5);
    assert_eq!(body["pages"], 3);
    let codes: Vec<&str> = body["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["shortUrl"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["code02", "code01"]);
}

#[tokio::test]
async fn test_list_links_search() {
    let app = common::test_app();
    let (user, token) = app.login_as("intern@dacoid.com").await;

    app.create_link(&user, "abc123", "https://rust-lang.org", None)
        .await;
    app.create_link(&user, "xyz789", "https://example.com/rust", None)
        .await;
    app.create_link(&user, "qqq000", "https://example.com", None)
        .await;

    let response = app
        .server
        .get("/api/links")
        .add_query_param("search", "rust")
        .authorization_bearer(&token)
        .await;

    let body: Value = response.json();
    assert_eq!(body["total"], 2);

    let response = app
        .server
        .get("/api/links")
        .add_query_param("search", "xyz")
        .authorization_bearer(&token)
        .await;

    let body: Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["links"][0]["shortUrl"], "xyz789");
}

#[tokio::test]
async fn test_list_links_empty() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    let response = app
        .server
        .get("/api/links")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 0);
    assert_eq!(body["pages"], 0);
    assert!(body["links"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_links_invalid_pagination() {
    let app = common::test_app();
    let (_, token) = app.login_as("intern@dacoid.com").await;

    for (key, value) in [
        ("page", "0"),
        ("limit", "0"),
        ("limit", "101"),
        ("page", "abc"),
        ("page", "9223372036854775807"),
    ] {
        let response = app
            .server
            .get("/api/links")
            .add_query_param(key, value)
            .authorization_bearer(&token)
            .await;

        response.assert_status_bad_request();
    }
}
