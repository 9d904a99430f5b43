//! Route definitions for the block store.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::block_store;
use crate::state::AppState;

/// Routes mounted at `/block-store`.
///
/// ```text
/// GET    /               -> list (public; ?category=&search=)
/// POST   /               -> create
/// GET    /categories     -> categories (public)
/// GET    /{id}           -> get_by_id (public)
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/usage     -> increment_usage
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(block_store::list).post(block_store::create))
        .route("/categories", get(block_store::categories))
        .route(
            "/{id}",
            get(block_store::get_by_id)
                .put(block_store::update)
                .delete(block_store::delete),
        )
        .route("/{id}/usage", post(block_store::increment_usage))
}
