//! Integration tests for the like/unlike services and the likes counter.

mod common;

use assert_matches::assert_matches;
use bricks_api::error::AppError;
use bricks_api::services::likes::{like_valuation, unlike_valuation};
use bricks_api::services::likes_counter;
use bricks_core::error::CoreError;
use bricks_db::repositories::SystemMetricsRepo;
use common::{count_rows, create_brickset, create_user, create_valuation, likes_count};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_like_increments_counter(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let (u3, _) = create_user(&pool, "carol").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u2.id, set.id, 400).await;

    let like = like_valuation(&pool, valuation.id, u1.id).await.unwrap();
    assert_eq!(like.valuation_id, valuation.id);
    assert_eq!(like.user_id, u1.id);
    like_valuation(&pool, valuation.id, u3.id).await.unwrap();

    assert_eq!(likes_count(&pool, valuation.id).await, 2);
    assert_eq!(count_rows(&pool, "likes").await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_self_like_rejected_without_writing(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;

    let result = like_valuation(&pool, valuation.id, u1.id).await;
    assert_matches!(
        result,
        Err(AppError::Core(CoreError::LikeOwnValuation { valuation_id }))
            if valuation_id == valuation.id
    );
    assert_eq!(count_rows(&pool, "likes").await, 0);
    assert_eq!(likes_count(&pool, valuation.id).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_like_rejected(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;

    like_valuation(&pool, valuation.id, u2.id).await.unwrap();
    let result = like_valuation(&pool, valuation.id, u2.id).await;

    assert_matches!(result, Err(AppError::Core(CoreError::LikeDuplicate { .. })));
    assert_eq!(likes_count(&pool, valuation.id).await, 1);
}

/// Two concurrent likes by the same user: exactly one wins.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_likes_by_same_user(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;

    let first = tokio::spawn({
        let pool = pool.clone();
        async move { like_valuation(&pool, valuation.id, u2.id).await }
    });
    let second = tokio::spawn({
        let pool = pool.clone();
        async move { like_valuation(&pool, valuation.id, u2.id).await }
    });
    let results = [first.await.unwrap(), second.await.unwrap()];

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|result| {
            matches!(result, Err(AppError::Core(CoreError::LikeDuplicate { .. })))
        })
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(count_rows(&pool, "likes").await, 1);
    assert_eq!(likes_count(&pool, valuation.id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_like_unknown_valuation_is_not_found(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let result = like_valuation(&pool, 777, u1.id).await;
    assert_matches!(
        result,
        Err(AppError::Core(CoreError::NotFound { entity: "Valuation", id: 777 }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlike_is_not_idempotent(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;

    like_valuation(&pool, valuation.id, u2.id).await.unwrap();
    unlike_valuation(&pool, valuation.id, u2.id).await.unwrap();
    assert_eq!(likes_count(&pool, valuation.id).await, 0);
    assert_eq!(count_rows(&pool, "likes").await, 0);

    let result = unlike_valuation(&pool, valuation.id, u2.id).await;
    assert_matches!(result, Err(AppError::Core(CoreError::LikeNotFound { .. })));
    assert_eq!(likes_count(&pool, valuation.id).await, 0);
}

/// Only the liker's own like is removed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlike_without_own_like_is_not_found(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let (u3, _) = create_user(&pool, "carol").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;
    like_valuation(&pool, valuation.id, u2.id).await.unwrap();

    let result = unlike_valuation(&pool, valuation.id, u3.id).await;

    assert_matches!(result, Err(AppError::Core(CoreError::LikeNotFound { .. })));
    assert_eq!(likes_count(&pool, valuation.id).await, 1);
}

/// A counter that drifted to zero never goes negative on unlike.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlike_clamps_counter_at_zero(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;
    like_valuation(&pool, valuation.id, u2.id).await.unwrap();

    sqlx::query("UPDATE valuations SET likes_count = 0 WHERE id = $1")
        .bind(valuation.id)
        .execute(&pool)
        .await
        .unwrap();

    unlike_valuation(&pool, valuation.id, u2.id).await.unwrap();
    assert_eq!(likes_count(&pool, valuation.id).await, 0);
}

/// Two concurrent unlikes of the same like: one removes it, the other finds
/// nothing, and the counter is decremented exactly once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_unlikes_by_same_user(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let (u3, _) = create_user(&pool, "carol").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;
    like_valuation(&pool, valuation.id, u2.id).await.unwrap();
    like_valuation(&pool, valuation.id, u3.id).await.unwrap();

    let first = tokio::spawn({
        let pool = pool.clone();
        async move { unlike_valuation(&pool, valuation.id, u2.id).await }
    });
    let second = tokio::spawn({
        let pool = pool.clone();
        async move { unlike_valuation(&pool, valuation.id, u2.id).await }
    });
    let results = [first.await.unwrap(), second.await.unwrap()];

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let missing = results
        .iter()
        .filter(|result| matches!(result, Err(AppError::Core(CoreError::LikeNotFound { .. }))))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(missing, 1);
    assert_eq!(count_rows(&pool, "likes").await, 1);
    assert_eq!(likes_count(&pool, valuation.id).await, 1);
}

// ---------------------------------------------------------------------------
// Metrics recomputation
// ---------------------------------------------------------------------------

/// A like on the owner's valuation turns the set into a serviced one and an
/// unlike turns it back.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_like_and_unlike_recompute_metrics(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    create_brickset(&pool, u1.id, 54321).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;

    like_valuation(&pool, valuation.id, u2.id).await.unwrap();
    let metrics = SystemMetricsRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(metrics.total_sets, 2);
    assert_eq!(metrics.serviced_sets, 1);
    // u2 only liked: liking alone does not make a user active.
    assert_eq!(metrics.active_users, 1);

    unlike_valuation(&pool, valuation.id, u2.id).await.unwrap();
    let metrics = SystemMetricsRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(metrics.total_sets, 2);
    assert_eq!(metrics.serviced_sets, 0);
}

/// A rejected like leaves the metrics row untouched.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_like_does_not_touch_metrics(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u1.id, set.id, 400).await;

    like_valuation(&pool, valuation.id, u1.id).await.unwrap_err();

    let metrics = SystemMetricsRepo::get(&pool).await.unwrap().unwrap();
    assert_eq!(metrics.total_sets, 0);
    assert_eq!(metrics.serviced_sets, 0);
    assert_eq!(metrics.active_users, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counter_maintainer_rejects_unknown_valuation(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let result = likes_counter::on_like_created(&mut *conn, 31_337).await;
    assert_matches!(
        result,
        Err(AppError::Core(CoreError::NotFound { entity: "Valuation", id: 31_337 }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counter_maintainer_returns_fresh_metrics(pool: PgPool) {
    let (u1, _) = create_user(&pool, "alice").await;
    let (u2, _) = create_user(&pool, "bob").await;
    let set = create_brickset(&pool, u1.id, 12345).await;
    let valuation = create_valuation(&pool, u2.id, set.id, 400).await;

    let mut conn = pool.acquire().await.unwrap();
    let metrics = likes_counter::on_like_created(&mut *conn, valuation.id)
        .await
        .unwrap();
    assert_eq!(metrics.total_sets, 1);
    assert_eq!(metrics.serviced_sets, 1);
    assert_eq!(metrics.active_users, 2);
    assert_eq!(likes_count(&pool, valuation.id).await, 1);

    likes_counter::on_like_removed(&mut *conn, valuation.id)
        .await
        .unwrap();
    assert_eq!(likes_count(&pool, valuation.id).await, 0);
}
