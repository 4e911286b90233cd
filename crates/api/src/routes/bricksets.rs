//! Route definitions for the `/bricksets` resource.
//!
//! Also nests the valuation routes under `/bricksets/{brickset_id}/valuations`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{brickset, valuation};
use crate::state::AppState;

/// Routes mounted at `/bricksets`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PATCH  /{id}                              -> update
/// DELETE /{id}                              -> delete
///
/// GET    /{brickset_id}/valuations          -> list_by_brickset
/// POST   /{brickset_id}/valuations          -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(brickset::list).post(brickset::create))
        .route(
            "/{id}",
            get(brickset::get_by_id)
                .patch(brickset::update)
                .delete(brickset::delete),
        )
        .route(
            "/{brickset_id}/valuations",
            get(valuation::list_by_brickset).post(valuation::create),
        )
}
