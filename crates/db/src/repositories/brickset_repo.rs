//! Repository for the `bricksets` table.

use bricks_core::listing::order_parts;
use bricks_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgExecutor};

use crate::models::brickset::{
    BrickSet, BrickSetDetail, BrickSetFilter, BrickSetListItem, BrickSetStats, CreateBrickSet,
    UpdateBrickSet,
};
use crate::models::valuation::{TopValuation, Valuation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, number, production_status, completeness, \
                       has_instructions, has_box, is_factory_sealed, \
                       owner_initial_estimate, created_at, updated_at";

/// Same columns qualified with the `b` alias, for joined queries.
const B_COLUMNS: &str = "b.id, b.owner_id, b.number, b.production_status, b.completeness, \
                         b.has_instructions, b.has_box, b.is_factory_sealed, \
                         b.owner_initial_estimate, b.created_at, b.updated_at";

/// Per-set valuation count and summed likes, joined laterally onto `b`.
const STATS_JOIN: &str = "CROSS JOIN LATERAL (
        SELECT COUNT(*) AS valuations_count,
               COALESCE(SUM(likes_count), 0)::BIGINT AS total_likes
        FROM valuations
        WHERE brickset_id = b.id
    ) stats";

/// One row of the BrickSet LEFT JOIN valuations load.
#[derive(Debug, FromRow)]
struct BrickSetValuationRow {
    #[sqlx(flatten)]
    brickset: BrickSet,
    v_id: Option<DbId>,
    v_user_id: Option<DbId>,
    v_value: Option<i32>,
    v_currency: Option<String>,
    v_comment: Option<String>,
    v_likes_count: Option<i32>,
    v_created_at: Option<Timestamp>,
    v_updated_at: Option<Timestamp>,
}

impl BrickSetValuationRow {
    /// The joined valuation, or `None` for the single row of a set without any.
    fn valuation(&self) -> Option<Valuation> {
        match (
            self.v_id,
            self.v_user_id,
            self.v_value,
            &self.v_currency,
            self.v_likes_count,
            self.v_created_at,
            self.v_updated_at,
        ) {
            (
                Some(id),
                Some(user_id),
                Some(value),
                Some(currency),
                Some(likes_count),
                Some(created_at),
                Some(updated_at),
            ) => Some(Valuation {
                id,
                user_id,
                brickset_id: self.brickset.id,
                value,
                currency: currency.clone(),
                comment: self.v_comment.clone(),
                likes_count,
                created_at,
                updated_at,
            }),
            _ => None,
        }
    }
}

/// One row of the public list query.
#[derive(Debug, FromRow)]
struct BrickSetListRow {
    #[sqlx(flatten)]
    stats: BrickSetStats,
    top_id: Option<DbId>,
    top_user_id: Option<DbId>,
    top_value: Option<i32>,
    top_currency: Option<String>,
    top_likes_count: Option<i32>,
    top_created_at: Option<Timestamp>,
}

impl From<BrickSetListRow> for BrickSetListItem {
    fn from(row: BrickSetListRow) -> Self {
        let top_valuation = match (
            row.top_id,
            row.top_user_id,
            row.top_value,
            row.top_currency,
            row.top_likes_count,
            row.top_created_at,
        ) {
            (
                Some(id),
                Some(user_id),
                Some(value),
                Some(currency),
                Some(likes_count),
                Some(created_at),
            ) => Some(TopValuation {
                id,
                user_id,
                value,
                currency,
                likes_count,
                created_at,
            }),
            _ => None,
        };
        BrickSetListItem {
            stats: row.stats,
            top_valuation,
        }
    }
}

/// Provides CRUD and read-model queries for BrickSets.
pub struct BrickSetRepo;

impl BrickSetRepo {
    /// Insert a new BrickSet, returning the created row.
    ///
    /// A global identity collision surfaces as a unique violation on
    /// `uq_bricksets_global_identity`.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateBrickSet,
    ) -> Result<BrickSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO bricksets
                (owner_id, number, production_status, completeness,
                 has_instructions, has_box, is_factory_sealed, owner_initial_estimate)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BrickSet>(&query)
            .bind(input.owner_id)
            .bind(input.number)
            .bind(input.production_status.as_str())
            .bind(input.completeness.as_str())
            .bind(input.has_instructions)
            .bind(input.has_box)
            .bind(input.is_factory_sealed)
            .bind(input.owner_initial_estimate)
            .fetch_one(executor)
            .await
    }

    /// Find a BrickSet by its ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<BrickSet>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bricksets WHERE id = $1");
        sqlx::query_as::<_, BrickSet>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Load a BrickSet and all of its valuations in a single round trip.
    ///
    /// Valuations are ordered most liked first, oldest first on ties.
    pub async fn find_with_valuations<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<BrickSetDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {B_COLUMNS},
                    v.id AS v_id, v.user_id AS v_user_id, v.value AS v_value,
                    v.currency AS v_currency, v.comment AS v_comment,
                    v.likes_count AS v_likes_count,
                    v.created_at AS v_created_at, v.updated_at AS v_updated_at
             FROM bricksets b
             LEFT JOIN valuations v ON v.brickset_id = b.id
             WHERE b.id = $1
             ORDER BY v.likes_count DESC, v.created_at ASC, v.id ASC"
        );
        let rows = sqlx::query_as::<_, BrickSetValuationRow>(&query)
            .bind(id)
            .fetch_all(executor)
            .await?;

        let valuations: Vec<Valuation> = rows.iter().filter_map(|row| row.valuation()).collect();
        Ok(rows
            .into_iter()
            .next()
            .map(|row| BrickSetDetail::new(row.brickset, valuations)))
    }

    /// Public list with optional filters, ordering and paging.
    ///
    /// `ordering` must come from `bricks_core::listing::resolve_ordering` so
    /// only whitelisted column names reach the SQL text.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        filter: &BrickSetFilter,
        ordering: &'static str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BrickSetListItem>, sqlx::Error> {
        let (column, direction) = order_parts(ordering);
        let query = format!(
            "SELECT {B_COLUMNS}, stats.valuations_count, stats.total_likes,
                    top.id AS top_id, top.user_id AS top_user_id, top.value AS top_value,
                    top.currency AS top_currency, top.likes_count AS top_likes_count,
                    top.created_at AS top_created_at
             FROM bricksets b
             {STATS_JOIN}
             LEFT JOIN LATERAL (
                 SELECT id, user_id, value, currency, likes_count, created_at
                 FROM valuations
                 WHERE brickset_id = b.id
                 ORDER BY likes_count DESC, created_at DESC
                 LIMIT 1
             ) top ON TRUE
             WHERE ($1::TEXT IS NULL OR b.production_status = $1)
               AND ($2::TEXT IS NULL OR b.completeness = $2)
               AND ($3::BOOLEAN IS NULL OR b.has_instructions = $3)
               AND ($4::BOOLEAN IS NULL OR b.has_box = $4)
               AND ($5::BOOLEAN IS NULL OR b.is_factory_sealed = $5)
             ORDER BY {column} {direction}, id {direction}
             LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query_as::<_, BrickSetListRow>(&query)
            .bind(filter.production_status.map(|status| status.as_str()))
            .bind(filter.completeness.map(|completeness| completeness.as_str()))
            .bind(filter.has_instructions)
            .bind(filter.has_box)
            .bind(filter.is_factory_sealed)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(BrickSetListItem::from).collect())
    }

    /// BrickSets owned by `owner_id` with their aggregate counters.
    pub async fn list_owned<'e>(
        executor: impl PgExecutor<'e>,
        owner_id: DbId,
        ordering: &'static str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BrickSetStats>, sqlx::Error> {
        let (column, direction) = order_parts(ordering);
        let query = format!(
            "SELECT {B_COLUMNS}, stats.valuations_count, stats.total_likes
             FROM bricksets b
             {STATS_JOIN}
             WHERE b.owner_id = $1
             ORDER BY {column} {direction}, id {direction}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BrickSetStats>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Apply a partial update. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_fields<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateBrickSet,
    ) -> Result<Option<BrickSet>, sqlx::Error> {
        let query = format!(
            "UPDATE bricksets SET
                has_box = COALESCE($2, has_box),
                owner_initial_estimate = COALESCE($3, owner_initial_estimate)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BrickSet>(&query)
            .bind(id)
            .bind(input.has_box)
            .bind(input.owner_initial_estimate)
            .fetch_optional(executor)
            .await
    }

    /// Delete a BrickSet. Valuations and their likes go with it via cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bricksets WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
