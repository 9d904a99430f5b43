//! Handlers for the block store: a library of reusable blocks.
//!
//! Browsing is public; editing the library and recording usage require the
//! admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use empower_core::block_content::BlockContent;
use empower_core::error::CoreError;
use empower_core::types::DbId;
use empower_db::models::block_store::{
    BlockStoreEntry, BlockStoreFilter, CreateBlockStoreEntry, UpdateBlockStoreEntry,
};
use empower_db::repositories::BlockStoreRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_entry_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<BlockStoreEntry> {
    BlockStoreRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BlockStoreEntry",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Public browsing
// ---------------------------------------------------------------------------

/// GET /api/v1/block-store?category=&search=
///
/// Public entries, most used first.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<BlockStoreFilter>,
) -> AppResult<impl IntoResponse> {
    let entries = BlockStoreRepo::list_public(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/block-store/categories
///
/// `"all"` and `"custom"` always lead, followed by every category in use by
/// a public entry.
pub async fn categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = BlockStoreRepo::categories(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/block-store/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = ensure_entry_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entry }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// POST /api/v1/block-store
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBlockStoreEntry>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    BlockContent::parse(&input.block_type, &input.content)?;

    let entry = BlockStoreRepo::create(&state.pool, &input, Some(admin.user_id)).await?;

    tracing::info!(
        entry_id = entry.id,
        block_type = %entry.block_type,
        category = %entry.category,
        user_id = admin.user_id,
        "Block store entry created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// PUT /api/v1/block-store/{id}
///
/// Partial update. New content is checked against the entry's block type.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBlockStoreEntry>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(content) = &input.content {
        let existing = ensure_entry_exists(&state.pool, id).await?;
        BlockContent::parse(&existing.block_type, content)?;
    }

    let entry = BlockStoreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BlockStoreEntry",
            id,
        }))?;

    tracing::info!(entry_id = id, user_id = admin.user_id, "Block store entry updated");

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/block-store/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if BlockStoreRepo::delete(&state.pool, id).await? {
        tracing::info!(entry_id = id, user_id = admin.user_id, "Block store entry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "BlockStoreEntry",
            id,
        }))
    }
}

/// POST /api/v1/block-store/{id}/usage
///
/// Record that the entry was inserted into a page.
pub async fn increment_usage(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = BlockStoreRepo::increment_usage(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BlockStoreEntry",
            id,
        }))?;

    tracing::debug!(entry_id = id, usage_count = entry.usage_count, "Block store usage recorded");

    Ok(Json(DataResponse { data: entry }))
}
