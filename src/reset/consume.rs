use chrono::Utc;

use crate::error::AppError;
use crate::state::AppState;
use crate::token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumed {
    pub email: String,
    pub credential: Option<String>,
}

/// Redeem a raw token exactly once and request a credential for its owner.
///
/// When `email` is given the owner is resolved from it, so a wrong token
/// surfaces as `InvalidToken`; otherwise the owner is found by token hash.
pub async fn consume(
    state: &AppState,
    raw_token: Option<&str>,
    email: Option<&str>,
) -> Result<Consumed, AppError> {
    let raw_token = super::required(raw_token, "token")?;
    let token_hash = token::hash(raw_token);

    let owner = match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => state.store.find_user_by_email(email).await?,
        None => state.store.find_user_by_token_hash(&token_hash).await?,
    };
    let user = owner.ok_or(AppError::NotFound)?;

    let email = state
        .store
        .atomic_consume(user.id, &token_hash, Utc::now())
        .await?;
    tracing::info!(user_id = %user.id, "PIN reset consumed");

    // The reset is gone at this point; a failed credential only degrades the response.
    let credential = match &state.issuer {
        Some(issuer) => match issuer.issue(&user).await {
            Ok(credential) => Some(credential),
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Credential issuance failed: {e}");
                None
            }
        },
        None => None,
    };

    Ok(Consumed { email, credential })
}
