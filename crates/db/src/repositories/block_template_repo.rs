//! Repository for the `block_templates` table.

use empower_core::types::DbId;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::block_template::BlockTemplate;

const COLUMNS: &str = "id, name, description, blocks, created_at, updated_at";

/// Provides CRUD operations for block templates.
///
/// `blocks` is validated by the caller (see
/// [`empower_core::templates::parse_template_blocks`]) before it gets here.
pub struct BlockTemplateRepo;

impl BlockTemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        blocks: &Value,
    ) -> Result<BlockTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO block_templates (name, description, blocks)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockTemplate>(&query)
            .bind(name)
            .bind(description)
            .bind(blocks)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlockTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM block_templates WHERE id = $1");
        sqlx::query_as::<_, BlockTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all templates, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<BlockTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM block_templates ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, BlockTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a template. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        description: Option<&str>,
        blocks: Option<&Value>,
    ) -> Result<Option<BlockTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE block_templates SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                blocks = COALESCE($4, blocks)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockTemplate>(&query)
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(blocks)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a template. Pages that loaded it keep their blocks.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM block_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
