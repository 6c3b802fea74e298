//! Persistence seam for pending PIN resets.
//!
//! Every flow talks to a [`ResetStore`] trait object, so the Postgres store and
//! the in-memory development store are interchangeable.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{PinReset, User};

pub use memory::MemoryResetStore;
pub use postgres::PgResetStore;

pub type DynResetStore = Arc<dyn ResetStore>;

#[async_trait]
pub trait ResetStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Replace whatever reset the user had pending.
    async fn set_reset_record(&self, user_id: Uuid, reset: &PinReset) -> Result<(), AppError>;

    async fn get_reset_record(&self, user_id: Uuid) -> Result<Option<PinReset>, AppError>;

    /// Remove the pending reset, leaving the user in place. Returns whether one existed.
    async fn delete_reset_record(&self, user_id: Uuid) -> Result<bool, AppError>;

    /// Verify and delete the user's reset as one isolated step, returning the user's email.
    ///
    /// Fails with `NotFound` when no reset is pending, `InvalidToken` when the
    /// hash differs (the reset is left untouched) and `Expired` when it is past
    /// `expires_at` (the reset is removed).
    async fn atomic_consume(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError>;

    /// Users whose reset expired strictly before `now`.
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, AppError>;

    /// Delete the listed users' resets that are still expired at `now`.
    async fn delete_expired(&self, user_ids: &[Uuid], now: DateTime<Utc>) -> Result<u64, AppError>;
}
