//! Repository for the `valuation_metrics` singleton.

use sqlx::PgExecutor;

use crate::models::system_metrics::{SystemMetrics, SYSTEM_METRICS_ID};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, total_sets, serviced_sets, active_users, created_at, updated_at";

/// Reads and rebuilds the metrics row.
pub struct SystemMetricsRepo;

impl SystemMetricsRepo {
    /// Fetch the singleton. `None` only if the seed row was removed.
    pub async fn get<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<SystemMetrics>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM valuation_metrics WHERE id = $1");
        sqlx::query_as::<_, SystemMetrics>(&query)
            .bind(SYSTEM_METRICS_ID)
            .fetch_optional(executor)
            .await
    }

    /// Recompute all three counters from the base tables and overwrite the
    /// singleton in one statement, creating it if missing.
    ///
    /// - `total_sets`: every BrickSet.
    /// - `serviced_sets`: BrickSets with a valuation by someone other than the
    ///   owner, or whose owner's valuation has at least one like.
    /// - `active_users`: users owning a BrickSet or authoring a valuation.
    pub async fn recompute<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<SystemMetrics, sqlx::Error> {
        let query = format!(
            "INSERT INTO valuation_metrics (id, total_sets, serviced_sets, active_users)
             SELECT $1,
                    (SELECT COUNT(*) FROM bricksets),
                    (SELECT COUNT(*) FROM bricksets b
                     WHERE EXISTS (
                         SELECT 1 FROM valuations v
                         WHERE v.brickset_id = b.id
                           AND (v.user_id <> b.owner_id OR v.likes_count > 0)
                     )),
                    (SELECT COUNT(*) FROM users u
                     WHERE EXISTS (SELECT 1 FROM bricksets b WHERE b.owner_id = u.id)
                        OR EXISTS (SELECT 1 FROM valuations v WHERE v.user_id = u.id))
             ON CONFLICT (id) DO UPDATE SET
                 total_sets = EXCLUDED.total_sets,
                 serviced_sets = EXCLUDED.serviced_sets,
                 active_users = EXCLUDED.active_users,
                 updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemMetrics>(&query)
            .bind(SYSTEM_METRICS_ID)
            .fetch_one(executor)
            .await
    }
}
