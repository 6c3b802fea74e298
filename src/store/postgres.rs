use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ResetStore;
use crate::db;
use crate::error::AppError;
use crate::models::{PinReset, User};
use crate::token;

pub struct PgResetStore {
    pool: PgPool,
}

impl PgResetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ResetStore for PgResetStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(db::users::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        Ok(db::users::find_by_pin_reset_hash(&self.pool, token_hash).await?)
    }

    async fn set_reset_record(&self, user_id: Uuid, reset: &PinReset) -> Result<(), AppError> {
        Ok(db::pin_resets::upsert(&self.pool, user_id, reset).await?)
    }

    async fn get_reset_record(&self, user_id: Uuid) -> Result<Option<PinReset>, AppError> {
        Ok(db::pin_resets::find_by_user(&self.pool, user_id).await?)
    }

    async fn delete_reset_record(&self, user_id: Uuid) -> Result<bool, AppError> {
        Ok(db::pin_resets::delete_by_user(&self.pool, user_id).await? > 0)
    }

    async fn atomic_consume(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent consumers of the same reset.
        let reset = db::pin_resets::find_by_user_for_update(&mut *tx, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !token::hashes_match(&reset.token_hash, token_hash) {
            return Err(AppError::InvalidToken);
        }

        db::pin_resets::delete_by_user(&mut *tx, user_id).await?;

        if reset.is_expired(now) {
            tx.commit().await?;
            return Err(AppError::Expired);
        }

        let user = db::users::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("reset owner {user_id} vanished")))?;

        tx.commit().await?;
        Ok(user.email)
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, AppError> {
        Ok(db::pin_resets::list_expired(&self.pool, now).await?)
    }

    async fn delete_expired(&self, user_ids: &[Uuid], now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let deleted = db::pin_resets::delete_expired(&mut *tx, user_ids, now).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}
