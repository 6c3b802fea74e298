use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::params::ResetParams;
use crate::error::{ApiError, Outcome};
use crate::reset;
use crate::state::SharedState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub email: String,
}

#[derive(Serialize)]
pub struct ConsumeResponse {
    pub success: bool,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

pub async fn issue_reset(
    State(state): State<SharedState>,
    params: ResetParams,
) -> Result<Json<IssueResponse>, ApiError> {
    let outcome = reset::issue(&state, params.email.as_deref())
        .await
        .map_err(|e| e.respond(Outcome::Success, state.config.is_production()))?;

    Ok(Json(IssueResponse {
        success: true,
        debug_link: outcome.debug_link,
        warning: outcome.warning,
    }))
}

pub async fn validate_reset(
    State(state): State<SharedState>,
    params: ResetParams,
) -> Result<Json<ValidateResponse>, ApiError> {
    let email = reset::validate(state.store.as_ref(), params.token.as_deref())
        .await
        .map_err(|e| e.respond(Outcome::Valid, state.config.is_production()))?;

    Ok(Json(ValidateResponse { valid: true, email }))
}

pub async fn consume_reset(
    State(state): State<SharedState>,
    params: ResetParams,
) -> Result<Json<ConsumeResponse>, ApiError> {
    let consumed = reset::consume(&state, params.token.as_deref(), params.email.as_deref())
        .await
        .map_err(|e| e.respond(Outcome::Success, state.config.is_production()))?;

    Ok(Json(ConsumeResponse {
        success: true,
        email: consumed.email,
        credential: consumed.credential,
    }))
}

/// Bare OPTIONS requests; real CORS preflights are answered by the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
