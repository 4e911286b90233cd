//! HTTP-level tests for registration, login, logout, the session cookie and
//! the login throttle.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, RETRY_AFTER, SET_COOKIE};
use axum::http::{Request, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    body_json, build_test_app, create_user, get, get_auth, post_auth, post_json, TEST_PASSWORD,
};

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_returns_public_profile(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({"username": "collector", "email": "c@example.com", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["username"], "collector");
    assert_eq!(body["email"], "c@example.com");
    assert!(body.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_username_is_conflict(pool: PgPool) {
    create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({"username": "collector", "email": "other@example.com", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_short_password_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({"username": "collector", "email": "c@example.com", "password": "short"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_sets_http_only_cookie(pool: PgPool) {
    create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({"username": "collector", "password": TEST_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("login should set a cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let body = body_json(response).await;
    assert_eq!(body["user"]["username"], "collector");
    assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_failures_are_indistinguishable(pool: PgPool) {
    create_user(&pool, "collector").await;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, is_active)
         SELECT 'dormant', 'd@example.com', password_hash, false
         FROM users WHERE username = 'collector'",
    )
    .execute(&pool)
    .await
    .unwrap();

    let attempts = [
        json!({"username": "nobody", "password": TEST_PASSWORD}),
        json!({"username": "collector", "password": "wrong-password"}),
        json!({"username": "dormant", "password": TEST_PASSWORD}),
    ];
    let mut messages = Vec::new();
    for attempt in attempts {
        let app = build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/auth/login", attempt).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        messages.push(body_json(response).await["error"].clone());
    }
    assert!(messages.windows(2).all(|pair| pair[0] == pair[1]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_bearer_token(pool: PgPool) {
    let (user, token) = create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_session_cookie(pool: PgPool) {
    let (user, token) = create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header(COOKIE, format!("jwt_token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], user.username);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_without_credentials_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_with_garbage_token_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A valid token for a deactivated account is refused.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_for_inactive_user_is_unauthorized(pool: PgPool) {
    let (user, token) = create_user(&pool, "collector").await;
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_clears_cookie(pool: PgPool) {
    let (_, token) = create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    let response = post_auth(app, "/api/v1/auth/logout", &token).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("jwt_token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_without_session_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

// ---------------------------------------------------------------------------
// Login throttle
// ---------------------------------------------------------------------------

fn login_from(ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            json!({"username": "collector", "password": "wrong-password"}).to_string(),
        ))
        .unwrap()
}

/// Five attempts per minute per client; the sixth is refused before the
/// credentials are checked.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sixth_login_attempt_is_rate_limited(pool: PgPool) {
    create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    for attempt in 1..=5 {
        let response = app.clone().oneshot(login_from("203.0.113.5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "attempt {attempt}");
    }

    let response = app.clone().oneshot(login_from("203.0.113.5")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.headers().get(RETRY_AFTER).unwrap().to_str().unwrap(),
        "60"
    );
    assert_eq!(body_json(response).await["code"], "RATE_LIMITED");

    // Another client still gets through.
    let response = app.oneshot(login_from("198.51.100.20")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The throttle is scoped to login; other auth routes are unaffected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_throttle_does_not_apply_to_me(pool: PgPool) {
    let (_, token) = create_user(&pool, "collector").await;
    let app = build_test_app(pool);

    for _ in 0..8 {
        let response = get_auth(app.clone(), "/api/v1/auth/me", &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
