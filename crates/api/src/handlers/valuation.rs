//! Handlers for valuations, nested under `/bricksets/{id}/valuations` and
//! addressed directly at `/valuations/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bricks_core::error::CoreError;
use bricks_core::types::DbId;
use bricks_core::valuation::{resolve_currency, validate_value};
use bricks_db::models::valuation::{CreateValuation, Valuation};
use bricks_db::repositories::{BrickSetRepo, ValuationRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /bricksets/{id}/valuations`.
#[derive(Debug, Deserialize)]
pub struct CreateValuationRequest {
    pub value: i32,
    /// Defaults to `PLN` when omitted.
    pub currency: Option<String>,
    pub comment: Option<String>,
}

/// GET /api/v1/bricksets/{brickset_id}/valuations
///
/// Most liked first, paged with `?limit=&offset=`.
pub async fn list_by_brickset(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(brickset_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Valuation>>>> {
    ensure_brickset_exists(&state, brickset_id).await?;
    let (limit, offset) = params.page();
    let valuations =
        ValuationRepo::list_by_brickset(&state.pool, brickset_id, limit, offset).await?;
    Ok(Json(DataResponse { data: valuations }))
}

/// POST /api/v1/bricksets/{brickset_id}/valuations
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(brickset_id): Path<DbId>,
    Json(input): Json<CreateValuationRequest>,
) -> AppResult<(StatusCode, Json<Valuation>)> {
    validate_value(input.value).map_err(CoreError::Validation)?;
    let currency = resolve_currency(input.currency.as_deref()).map_err(CoreError::Validation)?;

    ensure_brickset_exists(&state, brickset_id).await?;

    let create = CreateValuation {
        user_id: auth_user.user_id,
        brickset_id,
        value: input.value,
        currency,
        comment: input.comment.filter(|comment| !comment.trim().is_empty()),
    };
    let valuation = ValuationRepo::create(&state.pool, &create)
        .await
        .map_err(AppError::from_write)?;

    tracing::info!(
        valuation_id = valuation.id,
        brickset_id,
        user_id = auth_user.user_id,
        "Valuation created"
    );
    Ok((StatusCode::CREATED, Json(valuation)))
}

/// GET /api/v1/valuations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Valuation>> {
    let valuation = ValuationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Valuation",
            id,
        }))?;
    Ok(Json(valuation))
}

async fn ensure_brickset_exists(state: &AppState, brickset_id: DbId) -> AppResult<()> {
    BrickSetRepo::find_by_id(&state.pool, brickset_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BrickSet",
            id: brickset_id,
        }))
}
