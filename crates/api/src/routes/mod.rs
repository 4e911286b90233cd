pub mod auth;
pub mod bricksets;
pub mod health;
pub mod metrics;
pub mod users;
pub mod valuations;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public, throttled)
/// /auth/logout                                     logout (auth)
/// /auth/me                                         current profile (auth)
///
/// /bricksets                                       list (public), create (auth)
/// /bricksets/{id}                                  detail (public), update, delete (auth)
/// /bricksets/{id}/valuations                       list, create (auth)
///
/// /valuations/{id}                                 detail (public)
/// /valuations/{id}/likes                           list, like, unlike (auth)
///
/// /users/me/bricksets                              owned sets with editable flag (auth)
/// /users/me/valuations                             own valuations (auth)
///
/// /metrics/system                                  system metrics (public)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(config.login_throttle))
        .nest("/bricksets", bricksets::router())
        .nest("/valuations", valuations::router())
        .nest("/users/me", users::router())
        .nest("/metrics", metrics::router())
}
