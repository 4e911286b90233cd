//! Repository for the `likes` table.

use bricks_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::like::{Like, LikeListItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, valuation_id, created_at, updated_at";

/// Provides insert, delete and list operations for likes.
///
/// None of these touch `valuations.likes_count`; callers pair every write
/// with the matching counter update in the same transaction.
pub struct LikeRepo;

impl LikeRepo {
    /// Insert a like, returning the created row.
    ///
    /// A repeated like surfaces as a unique violation on
    /// `uq_likes_user_valuation`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        valuation_id: DbId,
    ) -> Result<Like, sqlx::Error> {
        let query = format!(
            "INSERT INTO likes (user_id, valuation_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Like>(&query)
            .bind(user_id)
            .bind(valuation_id)
            .fetch_one(executor)
            .await
    }

    /// Delete the like identified by `(valuation_id, user_id)`.
    ///
    /// Returns the removed row, or `None` if there was nothing to remove.
    pub async fn delete_by_pair<'e>(
        executor: impl PgExecutor<'e>,
        valuation_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Like>, sqlx::Error> {
        let query = format!(
            "DELETE FROM likes
             WHERE valuation_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Like>(&query)
            .bind(valuation_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Likes on a valuation, newest first.
    pub async fn list_by_valuation<'e>(
        executor: impl PgExecutor<'e>,
        valuation_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LikeListItem>, sqlx::Error> {
        sqlx::query_as::<_, LikeListItem>(
            "SELECT user_id, created_at AS liked_at
             FROM likes
             WHERE valuation_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(valuation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }
}
