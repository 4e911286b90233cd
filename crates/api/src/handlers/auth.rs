//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use bricks_core::account::{validate_email, validate_password, validate_username};
use bricks_core::constraints::{UQ_USERS_EMAIL, UQ_USERS_USERNAME};
use bricks_core::error::CoreError;
use bricks_db::models::user::{CreateUser, UserResponse};
use bricks_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_token, removal_cookie, session_cookie};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response. The token is also set as the session cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_string();

    validate_username(&username).map_err(CoreError::Validation)?;
    validate_email(&email).map_err(CoreError::Validation)?;
    validate_password(&input.password).map_err(CoreError::Validation)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username,
        email,
        password_hash,
    };
    let user = UserRepo::create(&state.pool, &create)
        .await
        .map_err(|err| match bricks_db::unique_violation(&err) {
            Some(UQ_USERS_USERNAME) => {
                AppError::Core(CoreError::Conflict("Username is already taken".into()))
            }
            Some(UQ_USERS_EMAIL) => {
                AppError::Core(CoreError::Conflict("Email is already registered".into()))
            }
            _ => AppError::Database(err),
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Unknown user, wrong password and inactive account all produce the same
/// 401 so the response does not reveal which one applied.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid || !user.is_active {
        tracing::warn!(user_id = user.id, "Login rejected");
        return Err(invalid());
    }

    let token = generate_token(user.id, &user.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    let jar = jar.add(session_cookie(token.clone(), &state.config.jwt));
    Ok((
        jar,
        Json(LoginResponse {
            user: UserResponse::from(&user),
            token,
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Clears the session cookie. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    tracing::info!(
        user_id = auth_user.user_id,
        username = %auth_user.username,
        "User logged out"
    );
    (jar.add(removal_cookie(&state.config.jwt)), StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    Ok(Json(UserResponse::from(&user)))
}
