//! Quiz Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use auth::application::deadline::DeadlineElapsed;
use kernel::error::conversions::is_transient_sqlx_error;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{0}")]
    Validation(String),

    /// Also returned for papers owned by someone else
    #[error("Paper not found")]
    PaperNotFound,

    #[error("Question not found")]
    QuestionNotFound,

    #[error("Store unavailable: {0}")]
    TransientStoreFailure(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl QuizError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QuizError::Validation(_) => StatusCode::BAD_REQUEST,
            QuizError::PaperNotFound | QuizError::QuestionNotFound => StatusCode::NOT_FOUND,
            QuizError::TransientStoreFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            QuizError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::Validation(_) => ErrorKind::BadRequest,
            QuizError::PaperNotFound | QuizError::QuestionNotFound => ErrorKind::NotFound,
            QuizError::TransientStoreFailure(_) => ErrorKind::ServiceUnavailable,
            QuizError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            QuizError::Validation(_) => "VALIDATION_ERROR",
            QuizError::PaperNotFound => "PAPER_NOT_FOUND",
            QuizError::QuestionNotFound => "QUESTION_NOT_FOUND",
            QuizError::TransientStoreFailure(_) => "STORE_UNAVAILABLE",
            QuizError::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            QuizError::TransientStoreFailure(_) => "Service temporarily unavailable".to_string(),
            QuizError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    fn log(&self) {
        match self {
            QuizError::Database(e) => tracing::error!(error = %e, "Quiz database error"),
            QuizError::TransientStoreFailure(msg) => {
                tracing::error!(message = %msg, "Quiz store unavailable")
            }
            _ => tracing::debug!(error = %self, "Quiz error"),
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<DeadlineElapsed> for QuizError {
    fn from(elapsed: DeadlineElapsed) -> Self {
        QuizError::TransientStoreFailure(elapsed.to_string())
    }
}

impl From<sqlx::Error> for QuizError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient_sqlx_error(&err) {
            QuizError::TransientStoreFailure(err.to_string())
        } else {
            QuizError::Database(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_kind_agree() {
        let all = [
            QuizError::Validation("Title cannot be empty".into()),
            QuizError::PaperNotFound,
            QuizError::QuestionNotFound,
            QuizError::TransientStoreFailure("timeout".into()),
        ];
        for err in all {
            assert_eq!(err.kind().status_code(), err.status_code().as_u16());
        }
    }

    #[test]
    fn test_store_errors_match_auth_classification() {
        let errors = || {
            [
                sqlx::Error::PoolTimedOut,
                sqlx::Error::PoolClosed,
                sqlx::Error::RowNotFound,
                sqlx::Error::ColumnNotFound("title".into()),
            ]
        };
        for (for_quiz, for_auth) in errors().into_iter().zip(errors()) {
            let quiz_err = QuizError::from(for_quiz);
            let auth_err = auth::AuthError::from(for_auth);
            assert_eq!(quiz_err.status_code(), auth_err.status_code(), "{quiz_err:?}");
            assert_eq!(quiz_err.code(), auth_err.code());
        }
        assert!(QuizError::from(sqlx::Error::PoolTimedOut).to_app_error().is_retryable());
    }

    #[test]
    fn test_elapsed_deadline_is_transient() {
        let err = QuizError::from(DeadlineElapsed {
            operation: "list_papers",
            limit: std::time::Duration::from_millis(20),
        });
        assert!(matches!(err, QuizError::TransientStoreFailure(ref m) if m.contains("list_papers")));
    }
}
