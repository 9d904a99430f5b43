//! Handlers for page blocks: CRUD, filtering, ordering and duplication.
//!
//! Content and settings edits are versioned by the repository; see
//! [`PageBlockRepo::update`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use empower_core::error::CoreError;
use empower_core::ordering::validate_batch_size;
use empower_core::types::DbId;
use empower_db::models::page_block::{
    BlockListFilter, CreatePageBlock, PageBlock, ReorderBlocksRequest, UpdatePageBlock,
};
use empower_db::repositories::PageBlockRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::page::ensure_page_exists;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a block or fail with 404.
pub(crate) async fn ensure_block_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<PageBlock> {
    PageBlockRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PageBlock",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Page-scoped handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/pages/{page_id}/blocks?type=&search=
///
/// Blocks come back in render order: ascending `order`, ties by id.
pub async fn list_by_page(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Query(filter): Query<BlockListFilter>,
) -> AppResult<impl IntoResponse> {
    ensure_page_exists(&state.pool, page_id).await?;
    let blocks = PageBlockRepo::list_by_page(&state.pool, page_id, &filter).await?;
    Ok(Json(DataResponse { data: blocks }))
}

/// POST /api/v1/pages/{page_id}/blocks
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<CreatePageBlock>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    input.validate_payload()?;
    ensure_page_exists(&state.pool, page_id).await?;

    let block = PageBlockRepo::create(&state.pool, page_id, &input).await?;

    tracing::info!(
        block_id = block.id,
        page_id,
        block_type = %block.block_type,
        order = block.sort_order,
        user_id = admin.user_id,
        "Block created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: block })))
}

/// POST /api/v1/pages/{page_id}/blocks/reorder
///
/// Applies every `{id, order}` pair in one transaction, or none of them.
pub async fn reorder(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<ReorderBlocksRequest>,
) -> AppResult<impl IntoResponse> {
    validate_batch_size(input.blocks.len())?;
    ensure_page_exists(&state.pool, page_id).await?;

    let result = PageBlockRepo::reorder(&state.pool, page_id, &input.blocks)
        .await?
        .map_err(|e| e.into_core("PageBlock"))?;

    tracing::info!(
        page_id,
        reordered = result.reordered,
        updated = result.updated,
        user_id = admin.user_id,
        "Blocks reordered"
    );

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/pages/{page_id}/blocks/normalize
///
/// Rewrites the page's block orders to `0..n-1` in render order.
pub async fn normalize(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_page_exists(&state.pool, page_id).await?;
    let result = PageBlockRepo::normalize_orders(&state.pool, page_id).await?;

    tracing::info!(
        page_id,
        total_blocks = result.total_blocks,
        updated = result.updated,
        user_id = admin.user_id,
        "Block orders normalized"
    );

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Block handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/blocks/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let block = ensure_block_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: block }))
}

/// PUT /api/v1/blocks/{id}
///
/// Partial update. The block type is fixed at creation, so content is
/// validated against the stored type.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePageBlock>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_block_exists(&state.pool, id).await?;
    input.validate_payload(&existing.block_type)?;

    let block = PageBlockRepo::update(
        &state.pool,
        id,
        &input,
        Some(admin.user_id),
        state.config.block_version_retention,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "PageBlock",
        id,
    }))?;

    tracing::info!(
        block_id = id,
        page_id = block.page_id,
        versioned = input.touches_versioned_fields(),
        user_id = admin.user_id,
        "Block updated"
    );

    Ok(Json(DataResponse { data: block }))
}

/// DELETE /api/v1/blocks/{id}
///
/// Hard delete; the block's versions go with it.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PageBlockRepo::delete(&state.pool, id).await? {
        tracing::info!(block_id = id, user_id = admin.user_id, "Block deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "PageBlock",
            id,
        }))
    }
}

/// POST /api/v1/blocks/{id}/duplicate
///
/// Copies the block to the end of its page.
pub async fn duplicate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let copy = PageBlockRepo::duplicate(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PageBlock",
            id,
        }))?;

    tracing::info!(
        source_block_id = id,
        block_id = copy.id,
        page_id = copy.page_id,
        user_id = admin.user_id,
        "Block duplicated"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: copy })))
}
