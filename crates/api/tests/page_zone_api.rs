//! HTTP-level tests for page zones.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, get_anonymous, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

const ZONE_URI: &str = "/api/v1/zones/home/after-hero";

async fn save_zone(pool: &PgPool, blocks: &str) -> axum::http::Response<axum::body::Body> {
    put_json(build_test_app(pool.clone()), ZONE_URI, json!({ "blocks": blocks })).await
}

async fn read_zone(pool: &PgPool) -> Value {
    let response = get_anonymous(build_test_app(pool.clone()), ZONE_URI).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_then_get_round_trips_blocks(pool: PgPool) {
    let sent = json!([
        {
            "id": "b-1",
            "type": "je-hero",
            "order": 0,
            "content": { "title": "Welcome", "nested": { "list": [1, 2, 3] } },
            "settings": { "fullWidth": true }
        },
        { "id": "b-2", "type": "text", "content": {} }
    ]);

    let response = save_zone(&pool, &sent.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let zone = read_zone(&pool).await;
    assert_eq!(zone["page_slug"], "home");
    assert_eq!(zone["zone_name"], "after-hero");
    assert_eq!(zone["is_active"], true);

    let returned: Value = serde_json::from_str(&zone["blocks"].to_string()).unwrap();
    assert_eq!(returned, sent);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replacing_with_empty_array_clears_zone(pool: PgPool) {
    save_zone(&pool, r#"[{"id":"x","type":"text","content":{}}]"#).await;
    save_zone(&pool, "[]").await;

    let zone = read_zone(&pool).await;
    assert_eq!(zone["blocks"], json!([]));
    assert_eq!(zone["blocks"].to_string(), "[]");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_rejects_malformed_documents(pool: PgPool) {
    let bad = [
        "not json",
        r#"{"id":"x","type":"text"}"#,
        r#"[{"type":"text"}]"#,
        r#"[{"id":7,"type":"text"}]"#,
        r#"[{"id":"a","type":"text"},{"id":"a","type":"text"}]"#,
    ];
    for blocks in bad {
        let response = save_zone(&pool, blocks).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "blocks: {blocks}");
    }

    let response = get_anonymous(build_test_app(pool), ZONE_URI).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_rejects_nul_escapes(pool: PgPool) {
    let response = save_zone(
        &pool,
        r#"[{"id":"b1","type":"text","content":{"html":"a\u0000b"}}]"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = get_anonymous(build_test_app(pool), ZONE_URI).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_rejects_bad_slugs(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        "/api/v1/zones/Home/after%20hero",
        json!({ "blocks": "[]" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_zone_is_404(pool: PgPool) {
    let response = get_anonymous(build_test_app(pool), "/api/v1/zones/home/sidebar").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Zone 'sidebar' on page 'home' not found"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saving_a_zone_reactivates_it(pool: PgPool) {
    save_zone(&pool, "[]").await;

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("{ZONE_URI}/active"),
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    save_zone(&pool, r#"[{"id":"a","type":"text"}]"#).await;
    assert_eq!(read_zone(&pool).await["is_active"], true);

    put_json(
        build_test_app(pool.clone()),
        ZONE_URI,
        json!({ "blocks": "[]", "is_active": false }),
    )
    .await;
    assert_eq!(read_zone(&pool).await["is_active"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_and_delete(pool: PgPool) {
    for uri in [
        "/api/v1/zones/home/after-hero",
        "/api/v1/zones/home/before-footer",
        "/api/v1/zones/about/after-hero",
    ] {
        put_json(build_test_app(pool.clone()), uri, json!({ "blocks": "[]" })).await;
    }

    let response = get(build_test_app(pool.clone()), "/api/v1/zones/home").await;
    let names: Vec<_> = body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z["zone_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["after-hero", "before-footer"]);

    let response = get(build_test_app(pool.clone()), "/api/v1/zones").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);

    let response = delete(build_test_app(pool.clone()), ZONE_URI).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete(build_test_app(pool), ZONE_URI).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn available_pages_lists_zone_slots(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/zones/pages").await;
    assert_eq!(response.status(), StatusCode::OK);

    let pages = body_json(response).await["data"].clone();
    assert_eq!(pages[0]["slug"], "home");
    assert!(pages[0]["zones"]
        .as_array()
        .unwrap()
        .contains(&json!("after-hero")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_rewrites_array_and_orders(pool: PgPool) {
    save_zone(
        &pool,
        r#"[{"id":"a","type":"text","content":{"t":"A"}},{"id":"b","type":"text"},{"id":"c","type":"text"}]"#,
    )
    .await;

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("{ZONE_URI}/reorder"),
        json!({ "blocks": [{ "id": "c", "order": 0 }, { "id": "a", "order": 2 }, { "id": "b", "order": 1 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let blocks = read_zone(&pool).await["blocks"].clone();
    assert_eq!(
        blocks,
        json!([
            { "id": "c", "type": "text", "order": 0 },
            { "id": "b", "type": "text", "order": 1 },
            { "id": "a", "type": "text", "order": 2, "content": { "t": "A" } }
        ])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_errors(pool: PgPool) {
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("{ZONE_URI}/reorder"),
        json!({ "blocks": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    save_zone(&pool, r#"[{"id":"a","type":"text"}]"#).await;
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("{ZONE_URI}/reorder"),
        json!({ "blocks": [{ "id": "zzz", "order": 0 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_zone(&pool).await["blocks"], json!([{ "id": "a", "type": "text" }]));
}
