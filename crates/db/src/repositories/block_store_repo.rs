//! Repository for the `block_store` table.

use empower_core::search::{like_pattern, normalize_term};
use empower_core::types::DbId;
use sqlx::PgPool;

use crate::models::block_store::{
    BlockStoreEntry, BlockStoreFilter, CreateBlockStoreEntry, UpdateBlockStoreEntry,
    ALL_CATEGORIES, DEFAULT_CATEGORY,
};

const COLUMNS: &str = "id, name, description, category, icon, block_type, content, thumbnail, \
    tags, is_public, usage_count, created_by, created_at, updated_at";

/// Provides CRUD and usage tracking for block store entries.
pub struct BlockStoreRepo;

impl BlockStoreRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBlockStoreEntry,
        created_by: Option<DbId>,
    ) -> Result<BlockStoreEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO block_store
                (name, description, category, icon, block_type, content, thumbnail,
                 tags, is_public, created_by)
             VALUES ($1, $2, COALESCE($3, 'custom'), COALESCE($4, 'box'), $5, $6, $7,
                     COALESCE($8, '{{}}'::text[]), COALESCE($9, true), $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockStoreEntry>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.icon)
            .bind(&input.block_type)
            .bind(&input.content)
            .bind(&input.thumbnail)
            .bind(&input.tags)
            .bind(input.is_public)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by ID (public or not).
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BlockStoreEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM block_store WHERE id = $1");
        sqlx::query_as::<_, BlockStoreEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List public entries, most used first, then newest.
    ///
    /// `search` matches name, description or any tag, case-insensitively.
    pub async fn list_public(
        pool: &PgPool,
        filter: &BlockStoreFilter,
    ) -> Result<Vec<BlockStoreEntry>, sqlx::Error> {
        let search = normalize_term(filter.search.as_deref()).map(|t| like_pattern(&t));
        let query = format!(
            "SELECT {COLUMNS} FROM block_store
             WHERE is_public = true
               AND ($1::text IS NULL OR category = $1)
               AND ($2::text IS NULL
                    OR name ILIKE $2
                    OR description ILIKE $2
                    OR array_to_string(tags, ' ') ILIKE $2)
             ORDER BY usage_count DESC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, BlockStoreEntry>(&query)
            .bind(filter.category())
            .bind(search)
            .fetch_all(pool)
            .await
    }

    /// Update an entry. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlockStoreEntry,
    ) -> Result<Option<BlockStoreEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE block_store SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                icon = COALESCE($5, icon),
                content = COALESCE($6, content),
                thumbnail = COALESCE($7, thumbnail),
                tags = COALESCE($8, tags),
                is_public = COALESCE($9, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockStoreEntry>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.icon)
            .bind(&input.content)
            .bind(&input.thumbnail)
            .bind(&input.tags)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM block_store WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump an entry's usage counter. Returns `None` if the entry
    /// does not exist.
    pub async fn increment_usage(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BlockStoreEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE block_store SET usage_count = usage_count + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockStoreEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Category names for the store filter: `"all"`, `"custom"`, then every
    /// other category used by a public entry, alphabetically.
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM block_store
             WHERE is_public = true AND category <> ALL($1)
             ORDER BY category ASC",
        )
        .bind([ALL_CATEGORIES, DEFAULT_CATEGORY].as_slice())
        .fetch_all(pool)
        .await?;

        let mut categories = vec![ALL_CATEGORIES.to_string(), DEFAULT_CATEGORY.to_string()];
        categories.extend(rows.into_iter().map(|(c,)| c));
        Ok(categories)
    }
}
