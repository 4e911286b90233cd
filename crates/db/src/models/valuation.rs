//! Valuation entity model and DTOs.

use bricks_core::editability::ValuationStake;
use bricks_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A valuation row from the `valuations` table.
///
/// `likes_count` is maintained by the likes counter and is never written
/// from a request body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Valuation {
    pub id: DbId,
    pub user_id: DbId,
    pub brickset_id: DbId,
    pub value: i32,
    pub currency: String,
    pub comment: Option<String>,
    pub likes_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ValuationStake for Valuation {
    fn author_id(&self) -> DbId {
        self.user_id
    }

    fn likes_count(&self) -> i32 {
        self.likes_count
    }
}

/// DTO for creating a new valuation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateValuation {
    pub user_id: DbId,
    pub brickset_id: DbId,
    pub value: i32,
    pub currency: String,
    pub comment: Option<String>,
}

/// The most liked valuation of a BrickSet, shown on list items.
#[derive(Debug, Clone, Serialize)]
pub struct TopValuation {
    pub id: DbId,
    pub user_id: DbId,
    pub value: i32,
    pub currency: String,
    pub likes_count: i32,
    pub created_at: Timestamp,
}

/// Minimal BrickSet reference nested in owned valuation items.
#[derive(Debug, Clone, Serialize)]
pub struct BrickSetRef {
    pub id: DbId,
    pub number: i32,
}

/// Item of the caller's own valuation list.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedValuationListItem {
    #[serde(flatten)]
    pub valuation: Valuation,
    pub brickset: BrickSetRef,
}
