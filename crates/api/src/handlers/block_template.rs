//! Handlers for block templates and loading them into pages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use empower_core::error::CoreError;
use empower_core::templates::parse_template_blocks;
use empower_core::types::DbId;
use empower_db::models::block_template::{
    BlockTemplate, CreateBlockTemplate, UpdateBlockTemplate,
};
use empower_db::repositories::{BlockTemplateRepo, PageBlockRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_template_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<BlockTemplate> {
    BlockTemplateRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BlockTemplate",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Template CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/block-templates
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = BlockTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/block-templates
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBlockTemplate>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let blocks = parse_template_blocks(&input.blocks)?;

    let template = BlockTemplateRepo::create(
        &state.pool,
        &input.name,
        input.description.as_deref(),
        &input.blocks,
    )
    .await?;

    tracing::info!(
        template_id = template.id,
        block_count = blocks.len(),
        user_id = admin.user_id,
        "Block template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/block-templates/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = ensure_template_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/block-templates/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBlockTemplate>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(blocks) = &input.blocks {
        parse_template_blocks(blocks)?;
    }

    let template = BlockTemplateRepo::update(
        &state.pool,
        id,
        input.name.as_deref(),
        input.description.as_deref(),
        input.blocks.as_ref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "BlockTemplate",
        id,
    }))?;

    tracing::info!(template_id = id, user_id = admin.user_id, "Block template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/block-templates/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if BlockTemplateRepo::delete(&state.pool, id).await? {
        tracing::info!(template_id = id, user_id = admin.user_id, "Block template deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "BlockTemplate",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Loading into a page
// ---------------------------------------------------------------------------

/// POST /api/v1/pages/{page_id}/templates/{id}/load
///
/// Appends the template's blocks after the page's last block, in template
/// order, and returns the created blocks.
pub async fn load_into_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_id, template_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let template = ensure_template_exists(&state.pool, template_id).await?;
    let blocks = parse_template_blocks(&template.blocks)?;

    let created = PageBlockRepo::append_many(&state.pool, page_id, &blocks)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page_id,
        }))?;

    tracing::info!(
        template_id,
        page_id,
        block_count = created.len(),
        user_id = admin.user_id,
        "Block template loaded into page"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}
