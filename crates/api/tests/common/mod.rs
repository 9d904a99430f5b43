//! Shared helpers for HTTP-level integration tests.
//!
//! Requests are sent straight to the router with `tower::ServiceExt::oneshot`;
//! no socket is opened.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use empower_api::auth::jwt::{generate_access_token, JwtConfig};
use empower_api::config::ServerConfig;
use empower_api::router::build_app_router;
use empower_api::state::AppState;
use empower_core::roles::ROLE_ADMIN;
use empower_core::versioning::VersionRetention;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Id carried by the admin token minted for tests.
pub const ADMIN_USER_ID: i64 = 1;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        block_version_retention: VersionRetention::default(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Same as [`build_test_app`] with a custom configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint a bearer token for the given role, signed with the test secret.
pub fn token_for(role: &str) -> String {
    generate_access_token(ADMIN_USER_ID, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers (authenticated as admin unless noted)
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&token_for(ROLE_ADMIN)), None).await
}

/// GET without an Authorization header.
pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

/// GET with a token for an arbitrary role.
pub async fn get_as(app: Router, uri: &str, role: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(&token_for(role)), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(&token_for(ROLE_ADMIN)), Some(body)).await
}

/// POST with no request body.
pub async fn post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(&token_for(ROLE_ADMIN)), None).await
}

pub async fn post_json_anonymous(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&token_for(ROLE_ADMIN)), Some(body)).await
}

pub async fn put_json_as(app: Router, uri: &str, body: Value, role: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&token_for(role)), Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(&token_for(ROLE_ADMIN)), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a page through the API and return its id.
pub async fn create_page(pool: &PgPool, slug: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/pages",
        serde_json::json!({ "slug": slug, "title": slug }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a block through the API and return the response `data`.
pub async fn create_block(pool: &PgPool, page_id: i64, body: Value) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/pages/{page_id}/blocks"),
        body,
    )
    .await;
    body_json(response).await["data"].clone()
}
