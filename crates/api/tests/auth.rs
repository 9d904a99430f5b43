//! Authentication and role checks on the API surface.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_test_app, get, get_anonymous, get_as, post_json_anonymous, put_json,
    put_json_as,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_401(pool: PgPool) {
    let response = get_anonymous(build_test_app(pool), "/api/v1/pages").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_and_forged_tokens_are_401(pool: PgPool) {
    let request = Request::builder()
        .uri("/api/v1/pages")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = build_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/pages")
        .header("authorization", "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let response = build_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_is_403(pool: PgPool) {
    let response = get_as(build_test_app(pool.clone()), "/api/v1/block-templates", "user").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_as(
        build_test_app(pool),
        "/api/v1/zones/home/after-hero",
        json!({ "blocks": "[]" }),
        "editor",
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn writes_require_a_token(pool: PgPool) {
    let response = post_json_anonymous(
        build_test_app(pool),
        "/api/v1/block-store",
        json!({ "name": "Hero", "type": "text", "content": "<p>Hi</p>" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_reads_need_no_token(pool: PgPool) {
    put_json(
        build_test_app(pool.clone()),
        "/api/v1/zones/home/after-hero",
        json!({ "blocks": "[]" }),
    )
    .await;

    let response =
        get_anonymous(build_test_app(pool.clone()), "/api/v1/zones/home/after-hero").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_anonymous(build_test_app(pool.clone()), "/api/v1/block-store").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        get_anonymous(build_test_app(pool.clone()), "/api/v1/block-store/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Admin-only listing of the same zone still needs a token.
    let response = get_anonymous(build_test_app(pool.clone()), "/api/v1/zones/home").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = get(build_test_app(pool), "/api/v1/zones/home").await;
    assert_eq!(response.status(), StatusCode::OK);
}
