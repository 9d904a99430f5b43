//! Repository for the `page_zones` table.
//!
//! A zone's blocks are one JSON document; writes always replace the whole
//! array. Upserts are last-writer-wins. Reordering locks the row so it
//! composes with concurrent reorders, but not with a concurrent upsert from
//! an editor holding a stale copy.

use empower_core::ordering::{OrderAssignment, ReorderError};
use empower_core::zones::{reorder_zone_blocks, zone_blocks_from_value};
use serde_json::Value;
use sqlx::PgPool;

use crate::models::page_zone::PageZone;

const COLUMNS: &str = "id, page_slug, zone_name, blocks, is_active, created_at, updated_at";

/// Outcome of a zone reorder: `None` when the zone does not exist.
pub type ZoneReorderOutcome = Option<Result<PageZone, ReorderError<String>>>;

/// Provides lookup, upsert and ordering operations for page zones.
pub struct PageZoneRepo;

impl PageZoneRepo {
    /// Find a zone by page slug and zone name.
    pub async fn find(
        pool: &PgPool,
        page_slug: &str,
        zone_name: &str,
    ) -> Result<Option<PageZone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_zones WHERE page_slug = $1 AND zone_name = $2"
        );
        sqlx::query_as::<_, PageZone>(&query)
            .bind(page_slug)
            .bind(zone_name)
            .fetch_optional(pool)
            .await
    }

    /// List the zones of one page, by zone name.
    pub async fn list_by_page(pool: &PgPool, page_slug: &str) -> Result<Vec<PageZone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_zones WHERE page_slug = $1 ORDER BY zone_name ASC"
        );
        sqlx::query_as::<_, PageZone>(&query)
            .bind(page_slug)
            .fetch_all(pool)
            .await
    }

    /// List every zone, grouped by page.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<PageZone>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM page_zones ORDER BY page_slug ASC, zone_name ASC");
        sqlx::query_as::<_, PageZone>(&query).fetch_all(pool).await
    }

    /// Create the zone or replace its blocks and active flag.
    pub async fn upsert(
        pool: &PgPool,
        page_slug: &str,
        zone_name: &str,
        blocks: &Value,
        is_active: bool,
    ) -> Result<PageZone, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_zones (page_slug, zone_name, blocks, is_active)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_page_zones_page_zone DO UPDATE SET
                blocks = EXCLUDED.blocks,
                is_active = EXCLUDED.is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageZone>(&query)
            .bind(page_slug)
            .bind(zone_name)
            .bind(blocks)
            .bind(is_active)
            .fetch_one(pool)
            .await
    }

    /// Toggle a zone. Returns `None` if the zone does not exist.
    pub async fn set_active(
        pool: &PgPool,
        page_slug: &str,
        zone_name: &str,
        is_active: bool,
    ) -> Result<Option<PageZone>, sqlx::Error> {
        let query = format!(
            "UPDATE page_zones SET is_active = $3
             WHERE page_slug = $1 AND zone_name = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageZone>(&query)
            .bind(page_slug)
            .bind(zone_name)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a zone. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, page_slug: &str, zone_name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_zones WHERE page_slug = $1 AND zone_name = $2")
            .bind(page_slug)
            .bind(zone_name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reorder the blocks inside a zone and rewrite the array in the new
    /// order, with each block's `order` set to its index.
    ///
    /// A stored document that is no longer a valid block array surfaces as
    /// a decode error.
    pub async fn reorder_blocks(
        pool: &PgPool,
        page_slug: &str,
        zone_name: &str,
        assignments: &[OrderAssignment<String>],
    ) -> Result<ZoneReorderOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM page_zones
             WHERE page_slug = $1 AND zone_name = $2
             FOR UPDATE"
        );
        let Some(zone) = sqlx::query_as::<_, PageZone>(&query)
            .bind(page_slug)
            .bind(zone_name)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let blocks = zone_blocks_from_value(&zone.blocks)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let reordered = match reorder_zone_blocks(blocks, assignments) {
            Ok(reordered) => reordered,
            Err(e) => return Ok(Some(Err(e))),
        };
        let document =
            serde_json::to_value(&reordered).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let query = format!(
            "UPDATE page_zones SET blocks = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, PageZone>(&query)
            .bind(zone.id)
            .bind(&document)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(Ok(updated)))
    }
}
