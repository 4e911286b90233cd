//! Handler for `/metrics/system`.

use axum::extract::State;
use axum::Json;
use bricks_core::error::CoreError;
use bricks_core::metrics::{active_users_ratio, serviced_sets_ratio};
use bricks_core::types::Timestamp;
use bricks_db::models::system_metrics::SYSTEM_METRICS_ID;
use bricks_db::repositories::{SystemMetricsRepo, UserRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The metrics singleton plus derived ratios.
#[derive(Debug, Serialize)]
pub struct SystemMetricsResponse {
    pub total_sets: i64,
    pub serviced_sets: i64,
    pub active_users: i64,
    pub total_users: i64,
    pub serviced_sets_ratio: f64,
    pub active_users_ratio: f64,
    pub updated_at: Timestamp,
}

/// GET /api/v1/metrics/system
pub async fn system(State(state): State<AppState>) -> AppResult<Json<SystemMetricsResponse>> {
    let metrics = SystemMetricsRepo::get(&state.pool)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SystemMetrics",
            id: i64::from(SYSTEM_METRICS_ID),
        }))?;
    let total_users = UserRepo::count(&state.pool).await?;

    Ok(Json(SystemMetricsResponse {
        total_sets: metrics.total_sets,
        serviced_sets: metrics.serviced_sets,
        active_users: metrics.active_users,
        total_users,
        serviced_sets_ratio: serviced_sets_ratio(metrics.serviced_sets, metrics.total_sets),
        active_users_ratio: active_users_ratio(metrics.active_users, total_users),
        updated_at: metrics.updated_at,
    }))
}
