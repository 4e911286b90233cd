//! Handlers for the caller's own listings under `/users/me`.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use bricks_core::editability::is_editable;
use bricks_core::listing::{BRICKSET_ORDERINGS, OWNED_VALUATION_ORDERINGS};
use bricks_core::types::DbId;
use bricks_db::models::brickset::OwnedBrickSetListItem;
use bricks_db::models::valuation::{OwnedValuationListItem, Valuation};
use bricks_db::repositories::{BrickSetRepo, ValuationRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me/bricksets
///
/// Each item carries the `editable` flag. Valuations for the whole page are
/// fetched in one query and grouped per set.
pub async fn list_bricksets(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<OwnedBrickSetListItem>>>> {
    let (ordering, limit, offset) = params.resolve(BRICKSET_ORDERINGS);
    let page =
        BrickSetRepo::list_owned(&state.pool, auth_user.user_id, ordering, limit, offset).await?;

    let ids: Vec<DbId> = page.iter().map(|stats| stats.brickset.id).collect();
    let mut by_brickset: HashMap<DbId, Vec<Valuation>> = HashMap::new();
    for valuation in ValuationRepo::list_by_bricksets(&state.pool, &ids).await? {
        by_brickset
            .entry(valuation.brickset_id)
            .or_default()
            .push(valuation);
    }

    let items = page
        .into_iter()
        .map(|stats| {
            let valuations = by_brickset
                .get(&stats.brickset.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let editable = is_editable(stats.brickset.owner_id, valuations);
            OwnedBrickSetListItem { stats, editable }
        })
        .collect();

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/users/me/valuations
pub async fn list_valuations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<OwnedValuationListItem>>>> {
    let (ordering, limit, offset) = params.resolve(OWNED_VALUATION_ORDERINGS);
    let items =
        ValuationRepo::list_by_user(&state.pool, auth_user.user_id, ordering, limit, offset)
            .await?;
    Ok(Json(DataResponse { data: items }))
}
