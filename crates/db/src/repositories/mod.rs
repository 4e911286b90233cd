//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept a `PgExecutor` (the pool, or `&mut *tx` inside a transaction) as
//! the first argument.

pub mod brickset_repo;
pub mod like_repo;
pub mod system_metrics_repo;
pub mod user_repo;
pub mod valuation_repo;

pub use brickset_repo::BrickSetRepo;
pub use like_repo::LikeRepo;
pub use system_metrics_repo::SystemMetricsRepo;
pub use user_repo::UserRepo;
pub use valuation_repo::ValuationRepo;
