//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use gatekeep_core::UserError;
use gatekeep_core::ports::AuthError;
use gatekeep_shared::ErrorResponse;

const INVALID_TOKEN: &str = "invalid auth token";

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    pub fn invalid_token() -> Self {
        AppError::Unauthorized(INVALID_TOKEN.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Unavailable(detail) => {
                tracing::error!("Backend unavailable: {}", detail);
                ErrorResponse::service_unavailable()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Duplicate(_) => AppError::Conflict("account already exists".to_string()),
            UserError::NotFound(_) => AppError::NotFound("account does not exist".to_string()),
            UserError::Store(e) => AppError::Unavailable(e.to_string()),
            UserError::Cache(e) => AppError::Unavailable(e.to_string()),
            UserError::Hashing(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("invalid credentials".to_string())
            }
            AuthError::InvalidToken(reason) => {
                tracing::info!(reason = %reason, "Rejected invalid token");
                AppError::invalid_token()
            }
            AuthError::RevokedToken => AppError::invalid_token(),
            AuthError::Unauthorized => AppError::Forbidden,
            AuthError::Signing(msg) | AuthError::HashingError(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::Unavailable(e.to_string()),
            AuthError::Cache(e) => AppError::Unavailable(e.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
