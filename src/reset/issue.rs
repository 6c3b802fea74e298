use chrono::Utc;

use crate::email::templates;
use crate::email::Delivery;
use crate::error::AppError;
use crate::models::PinReset;
use crate::state::AppState;
use crate::token;

/// What the issue-reset endpoint reports back on success.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IssueOutcome {
    pub debug_link: Option<String>,
    pub warning: Option<String>,
}

/// The two redemption links carried in the reset email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetLinks {
    pub deep_link: String,
    pub web_link: String,
}

impl ResetLinks {
    pub fn new(app_scheme: &str, public_host: &str, token: &str) -> Self {
        let encoded: String = form_urlencoded::byte_serialize(token.as_bytes()).collect();
        Self {
            deep_link: format!("{app_scheme}://resetPin?token={encoded}"),
            web_link: format!("{}/?token={encoded}", public_host.trim_end_matches('/')),
        }
    }
}

/// Issue a new reset for `email` and try to deliver it.
///
/// Unknown accounts get the same empty outcome as known ones, so the
/// response never tells a caller which emails are registered.
pub async fn issue(state: &AppState, email: Option<&str>) -> Result<IssueOutcome, AppError> {
    let email = super::required(email, "email")?;

    if state.config.is_production() && state.transports.is_empty() {
        return Err(AppError::ServerMisconfigured(
            "no email transport configured".to_string(),
        ));
    }

    match issue_for(state, email).await {
        Err(AppError::UserNotFound) => {
            tracing::info!("PIN reset requested for an unknown account");
            Ok(IssueOutcome::default())
        }
        other => other,
    }
}

async fn issue_for(state: &AppState, email: &str) -> Result<IssueOutcome, AppError> {
    let user = state
        .store
        .find_user_by_email(email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let raw_token = token::generate();
    let reset = PinReset::new(token::hash(&raw_token), Utc::now());
    state.store.set_reset_record(user.id, &reset).await?;

    let links = ResetLinks::new(
        &state.config.app_scheme,
        &state.config.public_host,
        &raw_token,
    );
    let email = templates::pin_reset_email(
        &user.email,
        &links.deep_link,
        &links.web_link,
        PinReset::TTL_MINUTES,
    );
    let delivery = state.transports.deliver(&email).await;

    let production = state.config.is_production();
    match delivery {
        Delivery::Sent { transport } => {
            tracing::info!(user_id = %user.id, "PIN reset email sent via {transport}");
            Ok(IssueOutcome {
                debug_link: state.config.return_debug_link.then_some(links.web_link),
                warning: None,
            })
        }
        Delivery::NoTransport if production => Err(AppError::ServerMisconfigured(
            "no email transport configured".to_string(),
        )),
        Delivery::Failed { errors } if production => {
            // Same body an unknown account gets.
            tracing::error!(user_id = %user.id, "All email transports failed: {}", errors.join("; "));
            Ok(IssueOutcome::default())
        }
        Delivery::NoTransport => {
            tracing::warn!("No email transport configured; returning the reset link inline");
            Ok(IssueOutcome {
                debug_link: Some(links.web_link),
                warning: Some(
                    "No email transport configured - returning debugLink for development testing."
                        .to_string(),
                ),
            })
        }
        Delivery::Failed { errors } => {
            tracing::warn!("Every email transport failed; returning the reset link inline");
            Ok(IssueOutcome {
                debug_link: Some(links.web_link),
                warning: Some(format!(
                    "Email delivery failed ({}) - returning debugLink for development testing.",
                    errors.join("; ")
                )),
            })
        }
    }
}
