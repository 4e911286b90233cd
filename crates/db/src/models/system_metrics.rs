//! The `valuation_metrics` singleton.

use bricks_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// Identity of the only metrics row.
pub const SYSTEM_METRICS_ID: i16 = 1;

/// Aggregate counters, overwritten wholesale by every recompute.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemMetrics {
    pub id: i16,
    pub total_sets: i64,
    pub serviced_sets: i64,
    pub active_users: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
