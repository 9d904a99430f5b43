//! Route definitions for pages and their blocks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{block_template, page, page_block};
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{page_id}                         -> get_by_id
/// DELETE /{page_id}                         -> delete
/// GET    /{page_id}/blocks                  -> page_block::list_by_page (?type=&search=)
/// POST   /{page_id}/blocks                  -> page_block::create
/// POST   /{page_id}/blocks/reorder          -> page_block::reorder
/// POST   /{page_id}/blocks/normalize        -> page_block::normalize
/// POST   /{page_id}/templates/{id}/load     -> block_template::load_into_page
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page::list).post(page::create))
        .route("/{page_id}", get(page::get_by_id).delete(page::delete))
        .route(
            "/{page_id}/blocks",
            get(page_block::list_by_page).post(page_block::create),
        )
        .route("/{page_id}/blocks/reorder", post(page_block::reorder))
        .route("/{page_id}/blocks/normalize", post(page_block::normalize))
        .route(
            "/{page_id}/templates/{id}/load",
            post(block_template::load_into_page),
        )
}
