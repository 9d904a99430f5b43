//! Handlers for page zones.
//!
//! A zone is a named slot on a hand-built page that holds an ordered array of
//! blocks as a single JSON document. The public site reads zones; everything
//! else is admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use empower_core::error::CoreError;
use empower_core::ordering::validate_batch_size;
use empower_core::zones::{parse_zone_blocks, validate_slug, AVAILABLE_PAGES};
use empower_db::models::page_zone::{ReorderZoneBlocks, SetZoneActive, UpsertPageZone};
use empower_db::repositories::PageZoneRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn zone_not_found(page_slug: String, zone_name: String) -> AppError {
    AppError::Core(CoreError::ZoneNotFound {
        page_slug,
        zone_name,
    })
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/zones/{page_slug}/{zone_name}
///
/// Returns the zone whether or not it is active; the renderer skips inactive
/// zones.
pub async fn get_zone(
    State(state): State<AppState>,
    Path((page_slug, zone_name)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let zone = PageZoneRepo::find(&state.pool, &page_slug, &zone_name)
        .await?
        .ok_or_else(|| zone_not_found(page_slug, zone_name))?;
    Ok(Json(DataResponse { data: zone }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/zones
pub async fn list_all(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let zones = PageZoneRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: zones }))
}

/// GET /api/v1/zones/pages
///
/// The pages that render zone slots, with the slots each one offers.
pub async fn available_pages(RequireAdmin(_admin): RequireAdmin) -> impl IntoResponse {
    Json(DataResponse {
        data: AVAILABLE_PAGES,
    })
}

/// GET /api/v1/zones/{page_slug}
pub async fn list_by_page(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let zones = PageZoneRepo::list_by_page(&state.pool, &page_slug).await?;
    Ok(Json(DataResponse { data: zones }))
}

/// PUT /api/v1/zones/{page_slug}/{zone_name}
///
/// Replaces the zone's whole block array, creating the zone if needed.
/// `blocks` is JSON text; it must parse to an array of objects that each
/// carry a string `id` and `type`.
pub async fn upsert(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_slug, zone_name)): Path<(String, String)>,
    Json(input): Json<UpsertPageZone>,
) -> AppResult<impl IntoResponse> {
    validate_slug("page_slug", &page_slug)?;
    validate_slug("zone_name", &zone_name)?;
    let (document, blocks) = parse_zone_blocks(&input.blocks)?;

    let zone =
        PageZoneRepo::upsert(&state.pool, &page_slug, &zone_name, &document, input.is_active)
            .await?;

    tracing::info!(
        page_slug = %zone.page_slug,
        zone_name = %zone.zone_name,
        block_count = blocks.len(),
        is_active = zone.is_active,
        user_id = admin.user_id,
        "Zone saved"
    );

    Ok(Json(DataResponse { data: zone }))
}

/// DELETE /api/v1/zones/{page_slug}/{zone_name}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_slug, zone_name)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    if PageZoneRepo::delete(&state.pool, &page_slug, &zone_name).await? {
        tracing::info!(%page_slug, %zone_name, user_id = admin.user_id, "Zone deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(zone_not_found(page_slug, zone_name))
    }
}

/// PUT /api/v1/zones/{page_slug}/{zone_name}/active
pub async fn set_active(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_slug, zone_name)): Path<(String, String)>,
    Json(input): Json<SetZoneActive>,
) -> AppResult<impl IntoResponse> {
    let zone = PageZoneRepo::set_active(&state.pool, &page_slug, &zone_name, input.is_active)
        .await?
        .ok_or_else(|| zone_not_found(page_slug, zone_name))?;

    tracing::info!(
        page_slug = %zone.page_slug,
        zone_name = %zone.zone_name,
        is_active = zone.is_active,
        user_id = admin.user_id,
        "Zone toggled"
    );

    Ok(Json(DataResponse { data: zone }))
}

/// PUT /api/v1/zones/{page_slug}/{zone_name}/reorder
///
/// Moves blocks within the zone. The array is rewritten in the new order and
/// every block's `order` is set to its index.
pub async fn reorder(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_slug, zone_name)): Path<(String, String)>,
    Json(input): Json<ReorderZoneBlocks>,
) -> AppResult<impl IntoResponse> {
    validate_batch_size(input.blocks.len())?;

    let zone = PageZoneRepo::reorder_blocks(&state.pool, &page_slug, &zone_name, &input.blocks)
        .await?
        .ok_or_else(|| zone_not_found(page_slug, zone_name))?
        .map_err(|e| e.into_validation())?;

    tracing::info!(
        page_slug = %zone.page_slug,
        zone_name = %zone.zone_name,
        reordered = input.blocks.len(),
        user_id = admin.user_id,
        "Zone blocks reordered"
    );

    Ok(Json(DataResponse { data: zone }))
}
