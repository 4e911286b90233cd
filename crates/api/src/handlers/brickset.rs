//! Handlers for the `/bricksets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bricks_core::brickset::{
    validate_initial_estimate, validate_set_number, Completeness, ProductionStatus,
};
use bricks_core::error::CoreError;
use bricks_core::listing::BRICKSET_ORDERINGS;
use bricks_core::types::DbId;
use bricks_db::models::brickset::{
    BrickSet, BrickSetDetail, BrickSetFilter, BrickSetListItem, CreateBrickSet, UpdateBrickSet,
};
use bricks_db::repositories::BrickSetRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::services;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /bricksets`.
#[derive(Debug, Default, Deserialize)]
pub struct BrickSetListQuery {
    pub production_status: Option<String>,
    pub completeness: Option<String>,
    pub has_instructions: Option<bool>,
    pub has_box: Option<bool>,
    pub is_factory_sealed: Option<bool>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl BrickSetListQuery {
    fn filter(&self) -> Result<BrickSetFilter, CoreError> {
        let production_status = self
            .production_status
            .as_deref()
            .map(str::parse::<ProductionStatus>)
            .transpose()
            .map_err(CoreError::Validation)?;
        let completeness = self
            .completeness
            .as_deref()
            .map(str::parse::<Completeness>)
            .transpose()
            .map_err(CoreError::Validation)?;
        Ok(BrickSetFilter {
            production_status,
            completeness,
            has_instructions: self.has_instructions,
            has_box: self.has_box,
            is_factory_sealed: self.is_factory_sealed,
        })
    }

    fn list_params(&self) -> ListParams {
        ListParams {
            ordering: self.ordering.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Request body for `POST /bricksets`. The owner is the caller.
#[derive(Debug, Deserialize)]
pub struct CreateBrickSetRequest {
    pub number: i32,
    pub production_status: ProductionStatus,
    pub completeness: Completeness,
    #[serde(default)]
    pub has_instructions: bool,
    #[serde(default)]
    pub has_box: bool,
    #[serde(default)]
    pub is_factory_sealed: bool,
    pub owner_initial_estimate: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/bricksets
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<BrickSetListQuery>,
) -> AppResult<Json<DataResponse<Vec<BrickSetListItem>>>> {
    let filter = params.filter()?;
    let (ordering, limit, offset) = params.list_params().resolve(BRICKSET_ORDERINGS);
    let items = BrickSetRepo::list(&state.pool, &filter, ordering, limit, offset).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/bricksets
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateBrickSetRequest>,
) -> AppResult<(StatusCode, Json<BrickSet>)> {
    validate_set_number(input.number).map_err(CoreError::Validation)?;
    validate_initial_estimate(input.owner_initial_estimate).map_err(CoreError::Validation)?;

    let create = CreateBrickSet {
        owner_id: auth_user.user_id,
        number: input.number,
        production_status: input.production_status,
        completeness: input.completeness,
        has_instructions: input.has_instructions,
        has_box: input.has_box,
        is_factory_sealed: input.is_factory_sealed,
        owner_initial_estimate: input.owner_initial_estimate,
    };
    let brickset = BrickSetRepo::create(&state.pool, &create)
        .await
        .map_err(AppError::from_write)?;

    tracing::info!(
        brickset_id = brickset.id,
        user_id = auth_user.user_id,
        number = brickset.number,
        "BrickSet created"
    );
    Ok((StatusCode::CREATED, Json(brickset)))
}

/// GET /api/v1/bricksets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BrickSetDetail>> {
    let detail = BrickSetRepo::find_with_valuations(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BrickSet",
            id,
        }))?;
    Ok(Json(detail))
}

/// PATCH /api/v1/bricksets/{id}
///
/// Only `has_box` and `owner_initial_estimate` may change; any other field in
/// the body is rejected during deserialization.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrickSet>,
) -> AppResult<Json<BrickSetDetail>> {
    if input.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one of has_box, owner_initial_estimate must be provided".into(),
        )));
    }
    validate_initial_estimate(input.owner_initial_estimate).map_err(CoreError::Validation)?;

    let detail = services::brickset::update_brickset(&state.pool, id, &input, auth_user.user_id)
        .await?;
    Ok(Json(detail))
}

/// DELETE /api/v1/bricksets/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::brickset::delete_brickset(&state.pool, id, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
