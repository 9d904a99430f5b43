//! Handlers for block version history and restore.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use empower_core::error::CoreError;
use empower_core::types::DbId;
use empower_db::repositories::BlockVersionRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::page_block::ensure_block_exists;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/blocks/{id}/versions
///
/// Newest first; index 0 is the state just before the latest content or
/// settings change.
pub async fn list_by_block(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(block_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_block_exists(&state.pool, block_id).await?;
    let versions = BlockVersionRepo::list_by_block(&state.pool, block_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/block-versions/{id}/restore
///
/// Copies the version's content back onto its block and returns the block.
/// Settings, visibility, animation and order are left as they are.
pub async fn restore(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(version_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let block = BlockVersionRepo::restore(
        &state.pool,
        version_id,
        Some(admin.user_id),
        state.config.block_version_retention,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "BlockVersion",
        id: version_id,
    }))?;

    tracing::info!(
        version_id,
        block_id = block.id,
        user_id = admin.user_id,
        "Block version restored"
    );

    Ok(Json(DataResponse { data: block }))
}
