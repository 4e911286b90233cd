//! Route definitions for the caller's own resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/users/me`.
///
/// ```text
/// GET    /bricksets     -> list_bricksets
/// GET    /valuations    -> list_valuations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bricksets", get(me::list_bricksets))
        .route("/valuations", get(me::list_valuations))
}
