//! Handlers for `/valuations/{id}/likes`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bricks_core::error::CoreError;
use bricks_core::types::{DbId, Timestamp};
use bricks_db::models::like::LikeListItem;
use bricks_db::repositories::{LikeRepo, ValuationRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::services;
use crate::state::AppState;

/// Body returned by `POST /valuations/{id}/likes`.
#[derive(Debug, Serialize)]
pub struct LikeCreatedResponse {
    pub valuation_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// POST /api/v1/valuations/{id}/likes
pub async fn like(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(valuation_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<LikeCreatedResponse>)> {
    let like =
        services::likes::like_valuation(&state.pool, valuation_id, auth_user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(LikeCreatedResponse {
            valuation_id: like.valuation_id,
            user_id: like.user_id,
            created_at: like.created_at,
        }),
    ))
}

/// DELETE /api/v1/valuations/{id}/likes
pub async fn unlike(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(valuation_id): Path<DbId>,
) -> AppResult<StatusCode> {
    services::likes::unlike_valuation(&state.pool, valuation_id, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/valuations/{id}/likes
///
/// Newest first, paged with `?limit=&offset=`.
pub async fn list(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(valuation_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<LikeListItem>>>> {
    if ValuationRepo::find_by_id(&state.pool, valuation_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Valuation",
            id: valuation_id,
        }));
    }
    let (limit, offset) = params.page();
    let likes = LikeRepo::list_by_valuation(&state.pool, valuation_id, limit, offset).await?;
    Ok(Json(DataResponse { data: likes }))
}
