//! Route definitions for the `/valuations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{like, valuation};
use crate::state::AppState;

/// Routes mounted at `/valuations`.
///
/// ```text
/// GET    /{id}          -> get_by_id
/// GET    /{id}/likes    -> list
/// POST   /{id}/likes    -> like
/// DELETE /{id}/likes    -> unlike
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(valuation::get_by_id))
        .route(
            "/{id}/likes",
            get(like::list).post(like::like).delete(like::unlike),
        )
}
