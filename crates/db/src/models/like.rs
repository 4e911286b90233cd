//! Like entity model.

use bricks_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A like row from the `likes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Like {
    pub id: DbId,
    pub user_id: DbId,
    pub valuation_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Item of a valuation's like list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LikeListItem {
    pub user_id: DbId,
    pub liked_at: Timestamp,
}
