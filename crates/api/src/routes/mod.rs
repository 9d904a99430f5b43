pub mod block;
pub mod block_store;
pub mod block_template;
pub mod health;
pub mod page;
pub mod zone;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pages                                       list, create (admin)
/// /pages/{page_id}                             get, delete (admin)
/// /pages/{page_id}/blocks                      list (?type=&search=), create (admin)
/// /pages/{page_id}/blocks/reorder              reorder (POST, admin)
/// /pages/{page_id}/blocks/normalize            normalize orders (POST, admin)
/// /pages/{page_id}/templates/{id}/load         load template (POST, admin)
///
/// /blocks/{id}                                 get, update, delete (admin)
/// /blocks/{id}/duplicate                       duplicate (POST, admin)
/// /blocks/{id}/versions                        version history (admin)
/// /block-versions/{id}/restore                 restore (POST, admin)
///
/// /block-templates                             list, create (admin)
/// /block-templates/{id}                        get, update, delete (admin)
///
/// /block-store                                 list (public), create (admin)
/// /block-store/categories                      categories (public)
/// /block-store/{id}                            get (public), update, delete (admin)
/// /block-store/{id}/usage                      increment usage (POST, admin)
///
/// /zones                                       list all (admin)
/// /zones/pages                                 available pages (admin)
/// /zones/{page_slug}                           list page zones (admin)
/// /zones/{page_slug}/{zone_name}               get (public), upsert, delete (admin)
/// /zones/{page_slug}/{zone_name}/active        set active (PUT, admin)
/// /zones/{page_slug}/{zone_name}/reorder       reorder (PUT, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Pages, page-scoped block operations and template loading.
        .nest("/pages", page::router())
        // Individual blocks and their history.
        .nest("/blocks", block::router())
        .nest("/block-versions", block::version_router())
        .nest("/block-templates", block_template::router())
        .nest("/block-store", block_store::router())
        // Array-of-blocks zones on hand-built pages.
        .nest("/zones", zone::router())
}
