//! Integration tests for `BlockTemplateRepo`.

use empower_db::repositories::BlockTemplateRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_crud(pool: PgPool) {
    let blocks = json!([
        { "type": "text", "content": "<h2>Welcome</h2>", "settings": {} },
        { "type": "spacer", "content": { "height": 48 }, "settings": {} }
    ]);
    let template = BlockTemplateRepo::create(&pool, "Landing", Some("Hero and spacing"), &blocks)
        .await
        .unwrap();
    assert_eq!(template.blocks, blocks);

    let renamed = BlockTemplateRepo::update(&pool, template.id, Some("Landing v2"), None, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Landing v2");
    assert_eq!(renamed.description.as_deref(), Some("Hero and spacing"));
    assert_eq!(renamed.blocks, blocks);

    assert!(BlockTemplateRepo::delete(&pool, template.id).await.unwrap());
    assert!(BlockTemplateRepo::find_by_id(&pool, template.id).await.unwrap().is_none());
    assert!(BlockTemplateRepo::update(&pool, template.id, Some("x"), None, None)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_oldest_first(pool: PgPool) {
    let first = BlockTemplateRepo::create(&pool, "First", None, &json!([]))
        .await
        .unwrap();
    let second = BlockTemplateRepo::create(&pool, "Second", None, &json!([]))
        .await
        .unwrap();

    let ids: Vec<_> = BlockTemplateRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blocks_must_be_an_array(pool: PgPool) {
    let result = BlockTemplateRepo::create(&pool, "Broken", None, &json!({ "type": "text" })).await;
    assert!(result.is_err(), "check constraint should reject non-array blocks");
}
