#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use bricks_api::auth::jwt::{generate_token, JwtConfig};
use bricks_api::auth::password::hash_password;
use bricks_api::config::{LoginThrottle, ServerConfig};
use bricks_api::router::build_app_router;
use bricks_api::state::AppState;
use bricks_core::brickset::{Completeness, ProductionStatus};
use bricks_db::models::brickset::{BrickSet, CreateBrickSet};
use bricks_db::models::user::{CreateUser, User};
use bricks_db::models::valuation::{CreateValuation, Valuation};
use bricks_db::repositories::{BrickSetRepo, UserRepo, ValuationRepo};

/// Password used for every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "brick-password-123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        expiry_secs: 86_400,
        cookie_secure: false,
    }
}

/// Build a test `ServerConfig` with safe defaults. The pool is supplied by
/// `#[sqlx::test]`, so the database fields are unused.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        db_max_connections: 5,
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        login_throttle: LoginThrottle::default(),
        jwt: test_jwt_config(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return it with a valid token.
pub async fn create_user(pool: &PgPool, username: &str) -> (User, String) {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let token = generate_token(user.id, &user.username, &test_jwt_config())
        .expect("token generation should succeed");
    (user, token)
}

/// Insert the reference BrickSet: ACTIVE, COMPLETE, instructions and box,
/// not sealed.
pub async fn create_brickset(pool: &PgPool, owner_id: i64, number: i32) -> BrickSet {
    let input = CreateBrickSet {
        owner_id,
        number,
        production_status: ProductionStatus::Active,
        completeness: Completeness::Complete,
        has_instructions: true,
        has_box: true,
        is_factory_sealed: false,
        owner_initial_estimate: Some(300),
    };
    BrickSetRepo::create(pool, &input)
        .await
        .expect("brickset creation should succeed")
}

pub async fn create_valuation(
    pool: &PgPool,
    user_id: i64,
    brickset_id: i64,
    value: i32,
) -> Valuation {
    let input = CreateValuation {
        user_id,
        brickset_id,
        value,
        currency: "PLN".to_string(),
        comment: None,
    };
    ValuationRepo::create(pool, &input)
        .await
        .expect("valuation creation should succeed")
}

pub async fn likes_count(pool: &PgPool, valuation_id: i64) -> i32 {
    ValuationRepo::find_by_id(pool, valuation_id)
        .await
        .unwrap()
        .expect("valuation should exist")
        .likes_count
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
