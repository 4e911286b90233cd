//! Maintains the denormalized `likes_count` and the metrics singleton.
//!
//! Called by the like services on the connection of their open transaction,
//! right after the like row is inserted or removed. Nothing else writes
//! `valuations.likes_count` or `valuation_metrics`.

use bricks_core::error::CoreError;
use bricks_core::types::DbId;
use bricks_db::models::system_metrics::SystemMetrics;
use bricks_db::repositories::{SystemMetricsRepo, ValuationRepo};
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};

/// A like on `valuation_id` was inserted: bump its counter and rebuild metrics.
pub async fn on_like_created(
    conn: &mut PgConnection,
    valuation_id: DbId,
) -> AppResult<SystemMetrics> {
    let likes_count = ValuationRepo::increment_likes(&mut *conn, valuation_id)
        .await?
        .ok_or_else(|| valuation_gone(valuation_id))?;
    tracing::debug!(valuation_id, likes_count, "Like counter incremented");

    recompute_metrics(conn).await
}

/// A like on `valuation_id` was removed: lower its counter (floored at zero)
/// and rebuild metrics.
pub async fn on_like_removed(
    conn: &mut PgConnection,
    valuation_id: DbId,
) -> AppResult<SystemMetrics> {
    let likes_count = ValuationRepo::decrement_likes(&mut *conn, valuation_id)
        .await?
        .ok_or_else(|| valuation_gone(valuation_id))?;
    tracing::debug!(valuation_id, likes_count, "Like counter decremented");

    recompute_metrics(conn).await
}

async fn recompute_metrics(conn: &mut PgConnection) -> AppResult<SystemMetrics> {
    let metrics = SystemMetricsRepo::recompute(&mut *conn).await?;
    tracing::debug!(
        total_sets = metrics.total_sets,
        serviced_sets = metrics.serviced_sets,
        active_users = metrics.active_users,
        "System metrics recomputed"
    );
    Ok(metrics)
}

fn valuation_gone(valuation_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Valuation",
        id: valuation_id,
    })
}
