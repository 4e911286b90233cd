//! Liveness and schema readiness at `/health`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the database is reachable and fully migrated with its
    /// metrics row, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Debug, Default, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    pub migrations_applied: i64,
    pub migrations_known: i64,
    pub metrics_seeded: bool,
}

/// GET /health
///
/// 200 while the database answers, 503 when it cannot be reached.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, database) = match bricks_db::schema_status(&state.pool).await {
        Ok(schema) => (
            StatusCode::OK,
            if schema.is_ready() { "ok" } else { "degraded" },
            DatabaseHealth {
                reachable: true,
                migrations_applied: schema.applied_migrations,
                migrations_known: schema.known_migrations,
                metrics_seeded: schema.metrics_seeded,
            },
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not read the schema");
            let reachable = bricks_db::health_check(&state.pool).await.is_ok();
            let code = if reachable {
                StatusCode::OK
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            (
                code,
                "degraded",
                DatabaseHealth {
                    reachable,
                    ..DatabaseHealth::default()
                },
            )
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
