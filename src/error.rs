use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by the language-model provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    QuotaExceeded,
    InvalidApiKey,
    RateLimited,
    Other(String),
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::QuotaExceeded => write!(f, "insufficient_quota"),
            UpstreamError::InvalidApiKey => write!(f, "invalid_api_key"),
            UpstreamError::RateLimited => write!(f, "rate_limit_exceeded"),
            UpstreamError::Other(detail) => write!(f, "{}", detail),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    Upstream(UpstreamError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Upstream(UpstreamError::QuotaExceeded) => StatusCode::PAYMENT_REQUIRED,
            Error::Upstream(UpstreamError::InvalidApiKey) => StatusCode::UNAUTHORIZED,
            Error::Upstream(UpstreamError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error_message = match self {
            Error::BadRequest(msg)
            | Error::Unauthorized(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg) => msg,
            Error::Validation(err) => err.to_string(),
            Error::Json(err) => err.to_string(),
            Error::Upstream(UpstreamError::QuotaExceeded) => {
                "OpenAI API quota exceeded. Please check your billing.".to_string()
            }
            Error::Upstream(UpstreamError::InvalidApiKey) => {
                "Invalid OpenAI API key configuration.".to_string()
            }
            Error::Upstream(UpstreamError::RateLimited) => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            Error::Upstream(UpstreamError::Other(detail)) => {
                tracing::error!("AI generation failed: {}", detail);
                let message = "Failed to generate job description. Please try again.";
                if crate::config::is_development() {
                    format!("{} ({})", message, detail)
                } else {
                    message.to_string()
                }
            }
            other => {
                tracing::error!(error = ?other, "request failed");
                if crate::config::is_development() {
                    other.to_string()
                } else {
                    "An unexpected error occurred".to_string()
                }
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                Error::Conflict(unique_violation_message(db_err.constraint()))
            }
            other => Error::Database(other),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(err)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

pub(crate) fn unique_violation_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("applications_job_applicant_key") => "Already applied to this job".to_string(),
        Some("saved_jobs_job_jobseeker_key") => "Job already saved".to_string(),
        Some("users_email_key") => "User already exists".to_string(),
        _ => "Resource already exists".to_string(),
    }
}
