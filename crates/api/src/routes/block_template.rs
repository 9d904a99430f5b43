//! Route definitions for block templates.

use axum::routing::get;
use axum::Router;

use crate::handlers::block_template;
use crate::state::AppState;

/// Routes mounted at `/block-templates`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create
/// GET    /{id}     -> get_by_id
/// PUT    /{id}     -> update
/// DELETE /{id}     -> delete
/// ```
///
/// Loading a template into a page lives under `/pages`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(block_template::list).post(block_template::create))
        .route(
            "/{id}",
            get(block_template::get_by_id)
                .put(block_template::update)
                .delete(block_template::delete),
        )
}
