use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    MissingParameter(&'static str),
    UserNotFound,
    NotFound,
    Expired,
    InvalidToken,
    ServerMisconfigured(String),
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::MissingParameter(param) => write!(f, "Missing parameter: {param}"),
            AppError::UserNotFound => write!(f, "User not found"),
            AppError::NotFound => write!(f, "Reset token not found"),
            AppError::Expired => write!(f, "Reset token expired"),
            AppError::InvalidToken => write!(f, "Reset token does not match"),
            AppError::ServerMisconfigured(msg) => write!(f, "Server misconfigured: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl AppError {
    /// Machine-readable reason code returned to clients.
    pub fn reason(&self) -> String {
        match self {
            AppError::MissingParameter(param) => format!("missing_{param}"),
            AppError::UserNotFound | AppError::NotFound => "not_found".to_string(),
            AppError::Expired => "expired".to_string(),
            AppError::InvalidToken => "invalid".to_string(),
            AppError::ServerMisconfigured(_) => "server_misconfigured".to_string(),
            AppError::Internal(_) | AppError::Database(_) => "internal".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::InvalidToken => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::ServerMisconfigured(_) | AppError::Internal(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Human-readable message. Production gets fixed text only.
    pub fn message(&self, production: bool) -> String {
        if production {
            return match self {
                AppError::MissingParameter(_) => "Missing required parameter.",
                AppError::UserNotFound | AppError::NotFound => "Token not found.",
                AppError::Expired => "Token expired.",
                AppError::InvalidToken => "Invalid token.",
                AppError::ServerMisconfigured(_) => "Server misconfigured.",
                AppError::Internal(_) | AppError::Database(_) => "Internal server error.",
            }
            .to_string();
        }

        match self {
            AppError::MissingParameter(param) => {
                format!("Missing \"{param}\" parameter in the query string or body.")
            }
            AppError::UserNotFound => "No account is registered for this email.".to_string(),
            AppError::NotFound => "No pending reset matches this token.".to_string(),
            AppError::Expired => "The token has expired and was removed.".to_string(),
            AppError::InvalidToken => "The token does not match the pending reset.".to_string(),
            AppError::ServerMisconfigured(msg) => format!("Server misconfigured: {msg}"),
            AppError::Internal(msg) => format!("Internal error: {msg}"),
            AppError::Database(err) => format!("Internal error: {err}"),
        }
    }

    /// Attach the response context an endpoint needs to render this error.
    pub fn respond(self, outcome: Outcome, production: bool) -> ApiError {
        ApiError {
            error: self,
            outcome,
            production,
        }
    }
}

/// Which boolean flag an endpoint reports its result under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Valid,
}

impl Outcome {
    fn key(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Valid => "valid",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub outcome: Outcome,
    pub production: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.error {
            AppError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            AppError::Database(err) => tracing::error!("Database error: {err}"),
            AppError::ServerMisconfigured(msg) => tracing::error!("Server misconfigured: {msg}"),
            _ => {}
        }

        let mut body = serde_json::Map::new();
        body.insert(self.outcome.key().to_string(), json!(false));
        body.insert("reason".to_string(), json!(self.error.reason()));
        body.insert(
            "message".to_string(),
            json!(self.error.message(self.production)),
        );

        (self.error.status(), axum::Json(body)).into_response()
    }
}
