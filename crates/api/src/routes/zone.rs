//! Route definitions for page zones.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::page_zone;
use crate::state::AppState;

/// Routes mounted at `/zones`.
///
/// ```text
/// GET    /                                  -> list_all
/// GET    /pages                             -> available_pages
/// GET    /{page_slug}                       -> list_by_page
/// GET    /{page_slug}/{zone_name}           -> get_zone (public)
/// PUT    /{page_slug}/{zone_name}           -> upsert
/// DELETE /{page_slug}/{zone_name}           -> delete
/// PUT    /{page_slug}/{zone_name}/active    -> set_active
/// PUT    /{page_slug}/{zone_name}/reorder   -> reorder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page_zone::list_all))
        .route("/pages", get(page_zone::available_pages))
        .route("/{page_slug}", get(page_zone::list_by_page))
        .route(
            "/{page_slug}/{zone_name}",
            get(page_zone::get_zone)
                .put(page_zone::upsert)
                .delete(page_zone::delete),
        )
        .route("/{page_slug}/{zone_name}/active", put(page_zone::set_active))
        .route("/{page_slug}/{zone_name}/reorder", put(page_zone::reorder))
}
