//! Repository for the `page_blocks` table.
//!
//! Every multi-statement write (update with snapshot, reorder, normalise,
//! template append) runs in its own transaction with the affected rows locked,
//! so concurrent editors serialise instead of interleaving.

use empower_core::ordering::{
    apply_reorder, next_position, normalize_positions, OrderAssignment, ReorderError,
};
use empower_core::search::{like_pattern, normalize_term};
use empower_core::templates::TemplateBlock;
use empower_core::types::DbId;
use empower_core::versioning::VersionRetention;
use sqlx::{PgConnection, PgPool};

use crate::models::page_block::{
    BlockListFilter, CreatePageBlock, NormalizeResult, PageBlock, ReorderResult, UpdatePageBlock,
};
use crate::repositories::BlockVersionRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, page_id, block_type, content, settings, visibility, \
    animation, sort_order, created_at, updated_at";

/// Provides CRUD and ordering operations for page blocks.
pub struct PageBlockRepo;

impl PageBlockRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new block. When `order` is omitted the block is appended
    /// after the page's current last block.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreatePageBlock,
    ) -> Result<PageBlock, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_blocks
                (page_id, block_type, content, settings, visibility, animation, sort_order)
             VALUES (
                $1, $2, $3,
                COALESCE($4, '{{}}'::jsonb),
                COALESCE($5, '{{}}'::jsonb),
                COALESCE($6, '{{}}'::jsonb),
                COALESCE($7, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                              FROM page_blocks WHERE page_id = $1))
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageBlock>(&query)
            .bind(page_id)
            .bind(&input.block_type)
            .bind(&input.content)
            .bind(&input.settings)
            .bind(&input.visibility)
            .bind(&input.animation)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a block by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageBlock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_blocks WHERE id = $1");
        sqlx::query_as::<_, PageBlock>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a page's blocks in render order: `sort_order` ascending, ties
    /// broken by `id` ascending.
    ///
    /// `filter.block_type` matches exactly; `filter.search` is a
    /// case-insensitive substring match over the serialised content.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
        filter: &BlockListFilter,
    ) -> Result<Vec<PageBlock>, sqlx::Error> {
        let search = normalize_term(filter.search.as_deref()).map(|t| like_pattern(&t));
        let query = format!(
            "SELECT {COLUMNS} FROM page_blocks
             WHERE page_id = $1
               AND ($2::text IS NULL OR block_type = $2)
               AND ($3::text IS NULL OR content::text ILIKE $3)
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, PageBlock>(&query)
            .bind(page_id)
            .bind(&filter.block_type)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update.
    ///
    /// When the patch touches content or settings, the current content and
    /// settings are first written as a new version (and old versions beyond
    /// `retention` pruned) in the same transaction. Returns `None` if the
    /// block does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePageBlock,
        created_by: Option<DbId>,
        retention: VersionRetention,
    ) -> Result<Option<PageBlock>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };

        if input.touches_versioned_fields() {
            BlockVersionRepo::snapshot(&mut tx, &current, created_by).await?;
            BlockVersionRepo::prune(&mut tx, id, retention).await?;
        }

        let query = format!(
            "UPDATE page_blocks SET
                content = COALESCE($2, content),
                settings = COALESCE($3, settings),
                visibility = COALESCE($4, visibility),
                animation = COALESCE($5, animation),
                sort_order = COALESCE($6, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, PageBlock>(&query)
            .bind(id)
            .bind(&input.content)
            .bind(&input.settings)
            .bind(&input.visibility)
            .bind(&input.animation)
            .bind(input.sort_order)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Hard-delete a block. Its versions go with it (`ON DELETE CASCADE`).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_blocks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Ordering ─────────────────────────────────────────────────────

    /// Apply `{id, order}` assignments to a page's blocks.
    ///
    /// All of the page's blocks are locked for the duration. If any id is not
    /// a block of this page, or appears twice, nothing is written and the
    /// inner error says why. Only rows whose order actually changes are
    /// updated, so repeating a reorder writes nothing.
    pub async fn reorder(
        pool: &PgPool,
        page_id: DbId,
        assignments: &[OrderAssignment<DbId>],
    ) -> Result<Result<ReorderResult, ReorderError<DbId>>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut blocks = Self::lock_page_blocks(&mut tx, page_id).await?;

        let changed = match apply_reorder(&mut blocks, assignments) {
            Ok(changed) => changed,
            Err(e) => return Ok(Err(e)),
        };

        let positions: Vec<(DbId, i32)> = blocks
            .iter()
            .filter(|b| changed.contains(&b.id))
            .map(|b| (b.id, b.sort_order))
            .collect();
        Self::write_positions(&mut tx, &positions).await?;

        tx.commit().await?;
        Ok(Ok(ReorderResult {
            reordered: assignments.len(),
            updated: positions.len(),
        }))
    }

    /// Rewrite a page's block orders to `0..n` following the current listing
    /// order, closing gaps and breaking ties.
    pub async fn normalize_orders(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<NormalizeResult, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut blocks = Self::lock_page_blocks(&mut tx, page_id).await?;

        let before: Vec<i32> = blocks.iter().map(|b| b.sort_order).collect();
        let updated = normalize_positions(&mut blocks);

        let positions: Vec<(DbId, i32)> = blocks
            .iter()
            .zip(before)
            .filter(|(block, old)| block.sort_order != *old)
            .map(|(block, _)| (block.id, block.sort_order))
            .collect();
        Self::write_positions(&mut tx, &positions).await?;

        tx.commit().await?;
        Ok(NormalizeResult {
            total_blocks: blocks.len(),
            updated,
        })
    }

    /// Copy a block (type, content, settings, visibility, animation) to the
    /// end of its page. Versions are not copied. Returns `None` if the source
    /// block does not exist.
    pub async fn duplicate(pool: &PgPool, id: DbId) -> Result<Option<PageBlock>, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_blocks
                (page_id, block_type, content, settings, visibility, animation, sort_order)
             SELECT src.page_id, src.block_type, src.content, src.settings,
                    src.visibility, src.animation,
                    (SELECT COALESCE(MAX(sort_order) + 1, 0)
                     FROM page_blocks WHERE page_id = src.page_id)
             FROM page_blocks src
             WHERE src.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageBlock>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append `blocks` to the end of a page in the given order.
    ///
    /// The page row is locked so concurrent appends cannot interleave their
    /// positions. Returns `None` if the page does not exist.
    pub async fn append_many(
        pool: &PgPool,
        page_id: DbId,
        blocks: &[TemplateBlock],
    ) -> Result<Option<Vec<PageBlock>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let page: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM pages WHERE id = $1 FOR UPDATE")
                .bind(page_id)
                .fetch_optional(&mut *tx)
                .await?;
        if page.is_none() {
            return Ok(None);
        }

        let (max_order,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(sort_order) FROM page_blocks WHERE page_id = $1")
                .bind(page_id)
                .fetch_one(&mut *tx)
                .await?;
        let mut next = next_position(max_order);

        let query = format!(
            "INSERT INTO page_blocks (page_id, block_type, content, settings, sort_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(blocks.len());
        for block in blocks {
            let row = sqlx::query_as::<_, PageBlock>(&query)
                .bind(page_id)
                .bind(&block.block_type)
                .bind(&block.content)
                .bind(&block.settings)
                .bind(next)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
            next = next.saturating_add(1);
        }

        tx.commit().await?;
        Ok(Some(created))
    }

    // ── Transaction helpers ──────────────────────────────────────────

    /// Load and lock one block.
    pub(crate) async fn lock(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<PageBlock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_blocks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, PageBlock>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Load and lock all of a page's blocks in listing order.
    async fn lock_page_blocks(
        conn: &mut PgConnection,
        page_id: DbId,
    ) -> Result<Vec<PageBlock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_blocks
             WHERE page_id = $1
             ORDER BY sort_order ASC, id ASC
             FOR UPDATE"
        );
        sqlx::query_as::<_, PageBlock>(&query)
            .bind(page_id)
            .fetch_all(conn)
            .await
    }

    /// Write `(id, sort_order)` pairs in a single statement.
    async fn write_positions(
        conn: &mut PgConnection,
        positions: &[(DbId, i32)],
    ) -> Result<(), sqlx::Error> {
        if positions.is_empty() {
            return Ok(());
        }
        let (ids, orders): (Vec<DbId>, Vec<i32>) = positions.iter().copied().unzip();
        sqlx::query(
            "UPDATE page_blocks AS b SET sort_order = v.sort_order
             FROM UNNEST($1::bigint[], $2::int[]) AS v(id, sort_order)
             WHERE b.id = v.id",
        )
        .bind(&ids)
        .bind(&orders)
        .execute(conn)
        .await?;
        Ok(())
    }
}
