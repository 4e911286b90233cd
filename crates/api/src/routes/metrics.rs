//! Route definitions for `/metrics`.

use axum::routing::get;
use axum::Router;

use crate::handlers::metrics;
use crate::state::AppState;

/// Routes mounted at `/metrics`.
///
/// ```text
/// GET    /system        -> system
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/system", get(metrics::system))
}
