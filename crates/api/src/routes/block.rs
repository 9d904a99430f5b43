//! Route definitions for individual blocks and their version history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{block_version, page_block};
use crate::state::AppState;

/// Routes mounted at `/blocks`.
///
/// ```text
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/duplicate    -> duplicate
/// GET    /{id}/versions     -> block_version::list_by_block
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(page_block::get_by_id)
                .put(page_block::update)
                .delete(page_block::delete),
        )
        .route("/{id}/duplicate", post(page_block::duplicate))
        .route("/{id}/versions", get(block_version::list_by_block))
}

/// Routes mounted at `/block-versions`.
///
/// ```text
/// POST   /{id}/restore      -> restore
/// ```
pub fn version_router() -> Router<AppState> {
    Router::new().route("/{id}/restore", post(block_version::restore))
}
