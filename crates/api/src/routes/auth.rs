//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::config::LoginThrottle;
use crate::handlers::auth;
use crate::middleware::rate_limit::RateLimitLayer;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register    -> register
/// POST   /login       -> login (throttled per client IP)
/// POST   /logout      -> logout
/// GET    /me          -> me
/// ```
pub fn router(throttle: LoginThrottle) -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route(
            "/login",
            post(auth::login).layer(RateLimitLayer::new(throttle)),
        )
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}
