//! Handlers for the `/pages` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use empower_core::error::CoreError;
use empower_core::types::DbId;
use empower_db::models::page::{CreatePage, Page};
use empower_db::repositories::PageRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a page or fail with 404.
pub(crate) async fn ensure_page_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Page> {
    PageRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Page", id }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/pages
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let pages = PageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let page = PageRepo::create(&state.pool, &input).await?;

    tracing::info!(page_id = page.id, slug = %page.slug, user_id = admin.user_id, "Page created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// GET /api/v1/pages/{page_id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page_exists(&state.pool, page_id).await?;
    Ok(Json(DataResponse { data: page }))
}

/// DELETE /api/v1/pages/{page_id}
///
/// Removes the page together with its blocks and their version history.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PageRepo::delete(&state.pool, page_id).await? {
        tracing::info!(page_id, user_id = admin.user_id, "Page deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }))
    }
}
