use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ResetStore;
use crate::error::AppError;
use crate::models::{PinReset, User};
use crate::token;

/// In-process store for development and tests.
///
/// One mutex guards users and resets together, so each operation (including
/// `atomic_consume`) runs in isolation. The lock is never held across an await.
pub struct MemoryResetStore {
    inner: Mutex<Inner>,
    permissive: bool,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
    resets: HashMap<Uuid, PinReset>,
}

impl MemoryResetStore {
    /// Only users registered through [`MemoryResetStore::add_user`] exist.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            permissive: false,
        }
    }

    /// Every email resolves to a user, created on first lookup.
    pub fn permissive() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            permissive: true,
        }
    }

    pub fn add_user(&self, email: &str) -> Result<User, AppError> {
        let mut inner = self.lock()?;
        Ok(inner.get_or_create(email))
    }

    /// Number of pending resets.
    pub fn pending_count(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.resets.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryResetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn get_or_create(&mut self, email: &str) -> User {
        if let Some(user) = self.by_email.get(email).and_then(|id| self.users.get(id)) {
            return user.clone();
        }

        let user = User {
            id: Uuid::now_v7(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl ResetStore for MemoryResetStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut inner = self.lock()?;
        if self.permissive {
            return Ok(Some(inner.get_or_create(email)));
        }
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_user_by_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        let inner = self.lock()?;
        Ok(inner
            .resets
            .iter()
            .find(|(_, reset)| token::hashes_match(&reset.token_hash, token_hash))
            .and_then(|(user_id, _)| inner.users.get(user_id))
            .cloned())
    }

    async fn set_reset_record(&self, user_id: Uuid, reset: &PinReset) -> Result<(), AppError> {
        let mut inner = self.lock()?;
        if !inner.users.contains_key(&user_id) {
            return Err(AppError::UserNotFound);
        }
        inner.resets.insert(user_id, reset.clone());
        Ok(())
    }

    async fn get_reset_record(&self, user_id: Uuid) -> Result<Option<PinReset>, AppError> {
        Ok(self.lock()?.resets.get(&user_id).cloned())
    }

    async fn delete_reset_record(&self, user_id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock()?.resets.remove(&user_id).is_some())
    }

    async fn atomic_consume(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let mut inner = self.lock()?;

        let reset = inner.resets.get(&user_id).ok_or(AppError::NotFound)?;
        if !token::hashes_match(&reset.token_hash, token_hash) {
            return Err(AppError::InvalidToken);
        }

        let expired = reset.is_expired(now);
        inner.resets.remove(&user_id);
        if expired {
            return Err(AppError::Expired);
        }

        inner
            .users
            .get(&user_id)
            .map(|user| user.email.clone())
            .ok_or_else(|| AppError::Internal(format!("reset owner {user_id} vanished")))
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, AppError> {
        let inner = self.lock()?;
        let mut expired: Vec<(DateTime<Utc>, Uuid)> = inner
            .resets
            .iter()
            .filter(|(_, reset)| reset.expires_at < now)
            .map(|(user_id, reset)| (reset.expires_at, *user_id))
            .collect();
        expired.sort();
        Ok(expired.into_iter().map(|(_, user_id)| user_id).collect())
    }

    async fn delete_expired(&self, user_ids: &[Uuid], now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut inner = self.lock()?;
        let mut deleted = 0;
        for user_id in user_ids {
            if inner
                .resets
                .get(user_id)
                .is_some_and(|reset| reset.expires_at < now)
            {
                inner.resets.remove(user_id);
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
