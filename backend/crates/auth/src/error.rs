//! Auth Error Types
//!
//! Auth-specific failures. Each variant maps to a status, an `ErrorKind` and a
//! stable `code`, and renders through `kernel::error::AppError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::is_transient_sqlx_error;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::token::TokenError;

use crate::application::deadline::DeadlineElapsed;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or secret failed shape checks on signup
    #[error("{0}")]
    Validation(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    /// Unknown email, malformed input and wrong secret all land here
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access token is required")]
    MissingToken,

    #[error("Refresh token and account id are required")]
    MissingCredentials,

    /// The cause is logged, never rendered
    #[error("Access token is invalid or expired")]
    InvalidOrExpiredToken(#[source] TokenError),

    /// The reason is logged, never rendered
    #[error("Session not found")]
    SessionNotFound(SessionMiss),

    #[error("Session has expired")]
    SessionExpired,

    /// Store timed out or is unreachable; safe to retry
    #[error("Store unavailable: {0}")]
    TransientStoreFailure(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a refresh session could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMiss {
    MalformedAccountId,
    UnknownAccount,
    NoMatchingSession,
}

impl SessionMiss {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMiss::MalformedAccountId => "malformed_account_id",
            SessionMiss::UnknownAccount => "unknown_account",
            SessionMiss::NoMatchingSession => "no_matching_session",
        }
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail | AuthError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            AuthError::MissingToken
            | AuthError::MissingCredentials
            | AuthError::InvalidOrExpiredToken(_)
            | AuthError::SessionNotFound(_)
            | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
            AuthError::TransientStoreFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::DuplicateEmail | AuthError::InvalidCredentials => {
                ErrorKind::BadRequest
            }
            AuthError::MissingToken
            | AuthError::MissingCredentials
            | AuthError::InvalidOrExpiredToken(_)
            | AuthError::SessionNotFound(_)
            | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::TransientStoreFailure(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable reason, rendered as `code` in the body
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::MissingCredentials => "MISSING_CREDENTIALS",
            AuthError::InvalidOrExpiredToken(_) => "INVALID_OR_EXPIRED_TOKEN",
            AuthError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            AuthError::SessionExpired => "SESSION_EXPIRED",
            AuthError::TransientStoreFailure(_) => "STORE_UNAVAILABLE",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::TransientStoreFailure(_))
    }

    /// Convert to AppError. Server-side details stay out of the message.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::TransientStoreFailure(_) => "Service temporarily unavailable".to_string(),
            AuthError::Database(_) | AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let err = AppError::new(self.kind(), message).with_code(self.code());
        match self {
            AuthError::InvalidOrExpiredToken(_) => {
                err.with_action("Renew the access token with your refresh token")
            }
            AuthError::SessionNotFound(_) | AuthError::SessionExpired => err.with_action("Log in again"),
            AuthError::TransientStoreFailure(_) => err.with_action("Retry the request"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::TransientStoreFailure(msg) => {
                tracing::error!(message = %msg, "Auth store unavailable");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::SessionExpired => {
                tracing::warn!("Expired refresh session presented");
            }
            AuthError::SessionNotFound(reason) => {
                tracing::debug!(reason = reason.as_str(), "Refresh session not found");
            }
            AuthError::InvalidOrExpiredToken(cause) => {
                tracing::debug!(cause = %cause, "Access token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects report through `AppError`; shape failures become
/// `Validation`, availability problems stay retryable.
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            ErrorKind::ServiceUnavailable => AuthError::TransientStoreFailure(err.to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<DeadlineElapsed> for AuthError {
    fn from(elapsed: DeadlineElapsed) -> Self {
        AuthError::TransientStoreFailure(elapsed.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient_sqlx_error(&err) {
            AuthError::TransientStoreFailure(err.to_string())
        } else {
            AuthError::Database(err)
        }
    }
}
