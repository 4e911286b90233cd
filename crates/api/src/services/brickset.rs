//! Update and delete a BrickSet.
//!
//! Both services load the set with all of its valuations in one query, run
//! the edit-eligibility rule, and only then write. The load, the check and
//! the write share one transaction.

use bricks_core::editability::authorize_mutation;
use bricks_core::error::CoreError;
use bricks_core::types::DbId;
use bricks_db::models::brickset::{BrickSetDetail, UpdateBrickSet};
use bricks_db::repositories::BrickSetRepo;
use bricks_db::DbPool;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};

/// Apply `input` to the BrickSet and return its refreshed detail view.
///
/// Only fields present in `input` are written; callers validate that at
/// least one is set.
pub async fn update_brickset(
    pool: &DbPool,
    brickset_id: DbId,
    input: &UpdateBrickSet,
    requesting_user_id: DbId,
) -> AppResult<BrickSetDetail> {
    let mut tx = pool.begin().await?;

    load_authorized(&mut *tx, brickset_id, requesting_user_id).await?;

    BrickSetRepo::update_fields(&mut *tx, brickset_id, input)
        .await?
        .ok_or_else(|| brickset_not_found(brickset_id))?;

    let detail = BrickSetRepo::find_with_valuations(&mut *tx, brickset_id)
        .await?
        .ok_or_else(|| brickset_not_found(brickset_id))?;

    tx.commit().await?;

    tracing::info!(
        brickset_id,
        user_id = requesting_user_id,
        has_box = ?input.has_box,
        owner_initial_estimate = ?input.owner_initial_estimate,
        "BrickSet updated"
    );
    Ok(detail)
}

/// Delete the BrickSet. Its valuations and their likes are removed by the
/// storage cascade.
pub async fn delete_brickset(
    pool: &DbPool,
    brickset_id: DbId,
    requesting_user_id: DbId,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let detail = load_authorized(&mut *tx, brickset_id, requesting_user_id).await?;

    if !BrickSetRepo::delete(&mut *tx, brickset_id).await? {
        return Err(brickset_not_found(brickset_id));
    }

    tx.commit().await?;

    tracing::info!(
        brickset_id,
        user_id = requesting_user_id,
        valuations_removed = detail.valuations_count,
        "BrickSet deleted"
    );
    Ok(())
}

/// Load the set with its valuations and authorize the mutation.
///
/// Ownership is checked before any valuation is looked at.
async fn load_authorized(
    conn: &mut PgConnection,
    brickset_id: DbId,
    requesting_user_id: DbId,
) -> AppResult<BrickSetDetail> {
    let detail = BrickSetRepo::find_with_valuations(&mut *conn, brickset_id)
        .await?
        .ok_or_else(|| brickset_not_found(brickset_id))?;

    if let Err(err) = authorize_mutation(
        detail.brickset.owner_id,
        requesting_user_id,
        &detail.valuations,
    ) {
        if let CoreError::EditForbidden { reason } = &err {
            tracing::debug!(
                brickset_id,
                user_id = requesting_user_id,
                reason = %reason,
                "BrickSet mutation refused"
            );
        }
        return Err(err.into());
    }

    Ok(detail)
}

fn brickset_not_found(brickset_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "BrickSet",
        id: brickset_id,
    })
}
