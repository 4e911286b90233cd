//! Persistence layer for BrickSets, valuations, likes and the metrics
//! singleton.
//!
//! Repositories accept any [`sqlx::PgExecutor`], so the same method runs
//! against the pool or inside an open transaction (`&mut *tx`).

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::repositories::SystemMetricsRepo;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// SQLSTATE raised by PostgreSQL on a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Migrations embedded from `db/migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../db/migrations");

/// Create a connection pool capped at `max_connections`.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Schema state as seen from a running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    /// Migrations recorded as successful in `_sqlx_migrations`.
    pub applied_migrations: i64,
    /// Migrations embedded in this binary.
    pub known_migrations: i64,
    /// Whether the `valuation_metrics` singleton row exists.
    pub metrics_seeded: bool,
}

impl SchemaStatus {
    /// Every embedded migration is applied and the metrics row is present.
    pub fn is_ready(&self) -> bool {
        self.applied_migrations >= self.known_migrations && self.metrics_seeded
    }
}

/// Inspect the migration ledger and the metrics singleton.
pub async fn schema_status(pool: &DbPool) -> Result<SchemaStatus, sqlx::Error> {
    let (applied_migrations,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
            .fetch_one(pool)
            .await?;
    let metrics_seeded = SystemMetricsRepo::get(pool).await?.is_some();

    Ok(SchemaStatus {
        applied_migrations,
        known_migrations: MIGRATOR.iter().count() as i64,
        metrics_seeded,
    })
}

/// Name of the violated constraint if `err` is a unique violation.
///
/// Foreign-key, check and connection errors all return `None`.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            db_err.constraint()
        }
        _ => None,
    }
}
