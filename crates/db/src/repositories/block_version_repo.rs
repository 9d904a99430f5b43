//! Repository for the `block_versions` table.

use empower_core::types::DbId;
use empower_core::versioning::VersionRetention;
use sqlx::{PgConnection, PgPool};

use crate::models::block_version::BlockVersion;
use crate::models::page_block::PageBlock;
use crate::repositories::page_block_repo::{self, PageBlockRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, block_id, version_number, content, settings, created_by, created_at";

/// Provides snapshot, retention and restore operations for block versions.
pub struct BlockVersionRepo;

impl BlockVersionRepo {
    /// Find a version by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlockVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM block_versions WHERE id = $1");
        sqlx::query_as::<_, BlockVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all versions of a block, newest first.
    pub async fn list_by_block(
        pool: &PgPool,
        block_id: DbId,
    ) -> Result<Vec<BlockVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM block_versions
             WHERE block_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, BlockVersion>(&query)
            .bind(block_id)
            .fetch_all(pool)
            .await
    }

    /// Count the stored versions of a block.
    pub async fn count_for_block(pool: &PgPool, block_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM block_versions WHERE block_id = $1")
            .bind(block_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Restore a version's content onto its block.
    ///
    /// Only `content` is copied; settings, visibility, animation and order are
    /// left alone. The block's current content and settings are snapshotted
    /// first, so the restore itself can be undone. Returns `None` if the
    /// version (or its block) does not exist.
    pub async fn restore(
        pool: &PgPool,
        version_id: DbId,
        created_by: Option<DbId>,
        retention: VersionRetention,
    ) -> Result<Option<PageBlock>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM block_versions WHERE id = $1");
        let Some(version) = sqlx::query_as::<_, BlockVersion>(&query)
            .bind(version_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let Some(current) = PageBlockRepo::lock(&mut tx, version.block_id).await? else {
            return Ok(None);
        };

        Self::snapshot(&mut tx, &current, created_by).await?;

        let query = format!(
            "UPDATE page_blocks SET content = $2 WHERE id = $1 RETURNING {}",
            page_block_repo::COLUMNS
        );
        let restored = sqlx::query_as::<_, PageBlock>(&query)
            .bind(current.id)
            .bind(&version.content)
            .fetch_one(&mut *tx)
            .await?;

        Self::prune(&mut tx, current.id, retention).await?;

        tx.commit().await?;
        Ok(Some(restored))
    }

    // ── Transaction helpers ──────────────────────────────────────────

    /// Record `block`'s current content and settings as its next version.
    ///
    /// Callers must hold a row lock on the block so version numbers cannot
    /// race.
    pub(crate) async fn snapshot(
        conn: &mut PgConnection,
        block: &PageBlock,
        created_by: Option<DbId>,
    ) -> Result<BlockVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO block_versions (block_id, version_number, content, settings, created_by)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version_number), 0) + 1
                 FROM block_versions WHERE block_id = $1),
                $2, $3, $4
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockVersion>(&query)
            .bind(block.id)
            .bind(&block.content)
            .bind(&block.settings)
            .bind(created_by)
            .fetch_one(conn)
            .await
    }

    /// Delete all but the newest `retention` versions of a block. Returns the
    /// number of versions removed.
    pub(crate) async fn prune(
        conn: &mut PgConnection,
        block_id: DbId,
        retention: VersionRetention,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM block_versions
             WHERE block_id = $1
               AND id NOT IN (
                   SELECT id FROM block_versions
                   WHERE block_id = $1
                   ORDER BY version_number DESC
                   LIMIT $2
               )",
        )
        .bind(block_id)
        .bind(retention.keep())
        .execute(conn)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(
                block_id,
                pruned = result.rows_affected(),
                "Pruned block versions beyond retention"
            );
        }
        Ok(result.rows_affected())
    }
}
