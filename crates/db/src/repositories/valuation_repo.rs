//! Repository for the `valuations` table.

use bricks_core::listing::order_parts;
use bricks_core::types::DbId;
use sqlx::{FromRow, PgExecutor};

use crate::models::valuation::{BrickSetRef, CreateValuation, OwnedValuationListItem, Valuation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, brickset_id, value, currency, comment, \
                       likes_count, created_at, updated_at";

const V_COLUMNS: &str = "v.id, v.user_id, v.brickset_id, v.value, v.currency, v.comment, \
                         v.likes_count, v.created_at, v.updated_at";

#[derive(Debug, FromRow)]
struct OwnedValuationRow {
    #[sqlx(flatten)]
    valuation: Valuation,
    brickset_number: i32,
}

impl From<OwnedValuationRow> for OwnedValuationListItem {
    fn from(row: OwnedValuationRow) -> Self {
        let brickset = BrickSetRef {
            id: row.valuation.brickset_id,
            number: row.brickset_number,
        };
        OwnedValuationListItem {
            valuation: row.valuation,
            brickset,
        }
    }
}

/// Provides CRUD operations and the like counter primitives for valuations.
pub struct ValuationRepo;

impl ValuationRepo {
    /// Insert a new valuation, returning the created row.
    ///
    /// A second valuation by the same user on the same BrickSet surfaces as a
    /// unique violation on `uq_valuations_user_brickset`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateValuation,
    ) -> Result<Valuation, sqlx::Error> {
        let query = format!(
            "INSERT INTO valuations (user_id, brickset_id, value, currency, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Valuation>(&query)
            .bind(input.user_id)
            .bind(input.brickset_id)
            .bind(input.value)
            .bind(&input.currency)
            .bind(&input.comment)
            .fetch_one(executor)
            .await
    }

    /// Find a valuation by its ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Valuation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM valuations WHERE id = $1");
        sqlx::query_as::<_, Valuation>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All valuations of a BrickSet, most liked first, oldest first on ties.
    pub async fn list_by_brickset<'e>(
        executor: impl PgExecutor<'e>,
        brickset_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Valuation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM valuations
             WHERE brickset_id = $1
             ORDER BY likes_count DESC, created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Valuation>(&query)
            .bind(brickset_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// All valuations of several BrickSets at once, for batch evaluation.
    pub async fn list_by_bricksets<'e>(
        executor: impl PgExecutor<'e>,
        brickset_ids: &[DbId],
    ) -> Result<Vec<Valuation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM valuations
             WHERE brickset_id = ANY($1)
             ORDER BY brickset_id, id"
        );
        sqlx::query_as::<_, Valuation>(&query)
            .bind(brickset_ids)
            .fetch_all(executor)
            .await
    }

    /// Valuations authored by `user_id`, each with a reference to its BrickSet.
    pub async fn list_by_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        ordering: &'static str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OwnedValuationListItem>, sqlx::Error> {
        let (column, direction) = order_parts(ordering);
        let query = format!(
            "SELECT {V_COLUMNS}, b.number AS brickset_number
             FROM valuations v
             JOIN bricksets b ON b.id = v.brickset_id
             WHERE v.user_id = $1
             ORDER BY {column} {direction}, id {direction}
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, OwnedValuationRow>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(OwnedValuationListItem::from).collect())
    }

    /// Atomically add one to `likes_count`. Returns the new value, or `None`
    /// if the valuation no longer exists.
    pub async fn increment_likes<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE valuations SET likes_count = likes_count + 1
             WHERE id = $1
             RETURNING likes_count",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Atomically subtract one from `likes_count`, never going below zero.
    ///
    /// Returns the new value, or `None` if the valuation no longer exists.
    pub async fn decrement_likes<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE valuations SET likes_count = GREATEST(likes_count - 1, 0)
             WHERE id = $1
             RETURNING likes_count",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
