use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PinReset;

/// Insert or overwrite the user's pending reset.
pub async fn upsert(pool: &PgPool, user_id: Uuid, reset: &PinReset) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO pin_resets (user_id, token_hash, created_at, expires_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id) DO UPDATE
         SET token_hash = EXCLUDED.token_hash,
             created_at = EXCLUDED.created_at,
             expires_at = EXCLUDED.expires_at",
    )
    .bind(user_id)
    .bind(&reset.token_hash)
    .bind(reset.created_at)
    .bind(reset.expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_user<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<PinReset>, sqlx::Error> {
    sqlx::query_as::<_, PinReset>(
        "SELECT token_hash, created_at, expires_at FROM pin_resets WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Same as `find_by_user` but takes a row lock until the transaction ends.
pub async fn find_by_user_for_update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<PinReset>, sqlx::Error> {
    sqlx::query_as::<_, PinReset>(
        "SELECT token_hash, created_at, expires_at FROM pin_resets
         WHERE user_id = $1
         FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_by_user<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pin_resets WHERE user_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn list_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT user_id FROM pin_resets WHERE expires_at < $1 ORDER BY expires_at",
    )
    .bind(now)
    .fetch_all(pool)
    .await
}

/// Delete the given users' resets, skipping any that were reissued since the scan.
pub async fn delete_expired<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_ids: &[Uuid],
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pin_resets WHERE user_id = ANY($1) AND expires_at < $2")
        .bind(user_ids)
        .bind(now)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
