//! BrickSet entity model, DTOs and read models.

use bricks_core::brickset::{Completeness, ProductionStatus};
use bricks_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::valuation::{TopValuation, Valuation};

/// A BrickSet row from the `bricksets` table.
///
/// `production_status` and `completeness` are stored as text and kept in
/// range by check constraints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrickSet {
    pub id: DbId,
    pub owner_id: DbId,
    pub number: i32,
    pub production_status: String,
    pub completeness: String,
    pub has_instructions: bool,
    pub has_box: bool,
    pub is_factory_sealed: bool,
    pub owner_initial_estimate: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new BrickSet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrickSet {
    pub owner_id: DbId,
    pub number: i32,
    pub production_status: ProductionStatus,
    pub completeness: Completeness,
    pub has_instructions: bool,
    pub has_box: bool,
    pub is_factory_sealed: bool,
    pub owner_initial_estimate: Option<i32>,
}

/// Partial update. Only the two owner-editable fields exist here; fields
/// left as `None` are not touched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBrickSet {
    pub has_box: Option<bool>,
    pub owner_initial_estimate: Option<i32>,
}

impl UpdateBrickSet {
    pub fn is_empty(&self) -> bool {
        self.has_box.is_none() && self.owner_initial_estimate.is_none()
    }
}

/// A BrickSet together with every valuation it carries.
///
/// Returned by the detail endpoint and by the update service.
#[derive(Debug, Clone, Serialize)]
pub struct BrickSetDetail {
    #[serde(flatten)]
    pub brickset: BrickSet,
    pub valuations: Vec<Valuation>,
    pub valuations_count: i64,
    pub total_likes: i64,
}

impl BrickSetDetail {
    pub fn new(brickset: BrickSet, valuations: Vec<Valuation>) -> Self {
        let valuations_count = valuations.len() as i64;
        let total_likes = valuations
            .iter()
            .map(|valuation| i64::from(valuation.likes_count))
            .sum();
        Self {
            brickset,
            valuations,
            valuations_count,
            total_likes,
        }
    }
}

/// A BrickSet row with its aggregate valuation counters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrickSetStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub brickset: BrickSet,
    pub valuations_count: i64,
    pub total_likes: i64,
}

/// Item of the public BrickSet list.
#[derive(Debug, Clone, Serialize)]
pub struct BrickSetListItem {
    #[serde(flatten)]
    pub stats: BrickSetStats,
    pub top_valuation: Option<TopValuation>,
}

/// Item of the caller's own BrickSet list.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedBrickSetListItem {
    #[serde(flatten)]
    pub stats: BrickSetStats,
    /// Whether the owner may still update or delete the set.
    pub editable: bool,
}

/// Filters accepted by the public BrickSet list.
#[derive(Debug, Clone, Default)]
pub struct BrickSetFilter {
    pub production_status: Option<ProductionStatus>,
    pub completeness: Option<Completeness>,
    pub has_instructions: Option<bool>,
    pub has_box: Option<bool>,
    pub is_factory_sealed: Option<bool>,
}
