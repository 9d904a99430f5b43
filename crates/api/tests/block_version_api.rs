//! HTTP-level tests for block version history, restore and retention.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, create_block, create_page, delete, get, post,
    put_json, test_config, ADMIN_USER_ID,
};
use empower_core::versioning::VersionRetention;
use serde_json::{json, Value};
use sqlx::PgPool;

async fn versions(pool: &PgPool, block_id: &Value) -> Vec<Value> {
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/blocks/{block_id}/versions"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].as_array().unwrap().clone()
}

async fn styled_block(pool: &PgPool) -> Value {
    let page_id = create_page(pool, "about").await;
    create_block(
        pool,
        page_id,
        json!({
            "type": "text",
            "content": "<p>Original</p>",
            "settings": { "padding": 16 },
            "visibility": { "auth": { "loggedIn": true } },
            "animation": { "type": "slide-up", "delay": 100 },
            "order": 2
        }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn content_update_snapshots_previous_value(pool: PgPool) {
    let block = styled_block(&pool).await;

    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/blocks/{}", block["id"]),
        json!({ "content": "<p>Edited</p>" }),
    )
    .await;

    let history = versions(&pool, &block["id"]).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["content"], "<p>Original</p>");
    assert_eq!(history[0]["settings"], json!({ "padding": 16 }));
    assert_eq!(history[0]["version_number"], 1);
    assert_eq!(history[0]["created_by"], ADMIN_USER_ID);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn metadata_only_update_writes_no_version(pool: PgPool) {
    let block = styled_block(&pool).await;

    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/blocks/{}", block["id"]),
        json!({ "order": 7, "visibility": {}, "animation": { "type": "none" } }),
    )
    .await;

    assert!(versions(&pool, &block["id"]).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_copies_content_and_is_undoable(pool: PgPool) {
    let block = styled_block(&pool).await;
    let uri = format!("/api/v1/blocks/{}", block["id"]);
    put_json(build_test_app(pool.clone()), &uri, json!({ "content": "<p>Edited</p>" })).await;
    put_json(
        build_test_app(pool.clone()),
        &uri,
        json!({ "visibility": { "devices": { "tablet": false } } }),
    )
    .await;
    let live = body_json(get(build_test_app(pool.clone()), &uri).await).await["data"].clone();

    let original = versions(&pool, &block["id"]).await[0].clone();
    let response = post(
        build_test_app(pool.clone()),
        &format!("/api/v1/block-versions/{}/restore", original["id"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let restored = body_json(response).await["data"].clone();
    assert_eq!(restored["content"], "<p>Original</p>");
    assert_eq!(restored["settings"], live["settings"]);
    assert_eq!(restored["visibility"], live["visibility"]);
    assert_eq!(restored["animation"], live["animation"]);
    assert_eq!(restored["order"], live["order"]);

    // The overwritten content is now the newest version.
    let history = versions(&pool, &block["id"]).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["content"], "<p>Edited</p>");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_unknown_version_is_404(pool: PgPool) {
    let response = post(build_test_app(pool), "/api/v1/block-versions/31337/restore").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "BlockVersion with id 31337 not found"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn versions_of_deleted_block_are_gone(pool: PgPool) {
    let block = styled_block(&pool).await;
    let uri = format!("/api/v1/blocks/{}", block["id"]);
    put_json(build_test_app(pool.clone()), &uri, json!({ "content": "<p>Edited</p>" })).await;
    let version_id = versions(&pool, &block["id"]).await[0]["id"].clone();

    delete(build_test_app(pool.clone()), &uri).await;

    let response = get(build_test_app(pool.clone()), &format!("{uri}/versions")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = post(
        build_test_app(pool),
        &format!("/api/v1/block-versions/{version_id}/restore"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn configured_retention_caps_history(pool: PgPool) {
    let block = styled_block(&pool).await;
    let config = {
        let mut config = test_config();
        config.block_version_retention = VersionRetention::new(2);
        config
    };
    let uri = format!("/api/v1/blocks/{}", block["id"]);

    for i in 1..=5 {
        let response = put_json(
            build_test_app_with(pool.clone(), config.clone()),
            &uri,
            json!({ "content": format!("<p>v{i}</p>") }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let history = versions(&pool, &block["id"]).await;
    let contents: Vec<_> = history.iter().map(|v| v["content"].clone()).collect();
    assert_eq!(contents, vec![json!("<p>v4</p>"), json!("<p>v3</p>")]);
}
