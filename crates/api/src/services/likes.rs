//! Like and unlike a valuation.

use bricks_core::constraints::UQ_LIKES_USER_VALUATION;
use bricks_core::error::CoreError;
use bricks_core::types::DbId;
use bricks_db::models::like::Like;
use bricks_db::repositories::{LikeRepo, ValuationRepo};
use bricks_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::services::likes_counter;

/// Record that `user_id` likes `valuation_id`.
///
/// 1. The valuation must exist.
/// 2. Authors may not like their own valuation.
/// 3. The insert races safely: of two concurrent likes by the same user,
///    the loser hits `uq_likes_user_valuation` and gets `LikeDuplicate`.
/// 4. The counter and metrics are updated in the same transaction.
pub async fn like_valuation(pool: &DbPool, valuation_id: DbId, user_id: DbId) -> AppResult<Like> {
    let valuation = ValuationRepo::find_by_id(pool, valuation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Valuation",
            id: valuation_id,
        }))?;

    if valuation.user_id == user_id {
        tracing::debug!(valuation_id, user_id, "Self-like rejected");
        return Err(AppError::Core(CoreError::LikeOwnValuation { valuation_id }));
    }

    let mut tx = pool.begin().await?;

    let like = match LikeRepo::create(&mut *tx, user_id, valuation_id).await {
        Ok(like) => like,
        Err(err) if bricks_db::unique_violation(&err) == Some(UQ_LIKES_USER_VALUATION) => {
            tracing::debug!(valuation_id, user_id, "Duplicate like rejected");
            return Err(AppError::Core(CoreError::LikeDuplicate {
                valuation_id,
                user_id,
            }));
        }
        Err(err) => return Err(err.into()),
    };

    likes_counter::on_like_created(&mut *tx, valuation_id).await?;
    tx.commit().await?;

    tracing::info!(valuation_id, user_id, like_id = like.id, "Valuation liked");
    Ok(like)
}

/// Remove the like of `user_id` on `valuation_id`.
///
/// Not idempotent: a missing like is `LikeNotFound`, including right after a
/// successful unlike.
pub async fn unlike_valuation(pool: &DbPool, valuation_id: DbId, user_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let removed = LikeRepo::delete_by_pair(&mut *tx, valuation_id, user_id).await?;
    if removed.is_none() {
        tracing::debug!(valuation_id, user_id, "Unlike of missing like rejected");
        return Err(AppError::Core(CoreError::LikeNotFound {
            valuation_id,
            user_id,
        }));
    }

    likes_counter::on_like_removed(&mut *tx, valuation_id).await?;
    tx.commit().await?;

    tracing::info!(valuation_id, user_id, "Valuation unliked");
    Ok(())
}
