use chrono::Utc;

use crate::error::AppError;
use crate::store::ResetStore;
use crate::token;

/// Check a raw token without consuming it. Returns the owner's email.
///
/// An expired reset is removed on the way out; failing to remove it only logs.
pub async fn validate(store: &dyn ResetStore, raw_token: Option<&str>) -> Result<String, AppError> {
    let raw_token = super::required(raw_token, "token")?;
    let token_hash = token::hash(raw_token);

    let user = store
        .find_user_by_token_hash(&token_hash)
        .await?
        .ok_or(AppError::NotFound)?;

    // A reissue between the two reads leaves a different hash behind.
    let reset = store
        .get_reset_record(user.id)
        .await?
        .filter(|reset| token::hashes_match(&reset.token_hash, &token_hash))
        .ok_or(AppError::NotFound)?;

    let now = Utc::now();
    if reset.is_expired(now) {
        if let Err(e) = store.delete_expired(&[user.id], now).await {
            tracing::warn!(user_id = %user.id, "Failed to remove expired PIN reset: {e}");
        }
        return Err(AppError::Expired);
    }

    Ok(user.email)
}
