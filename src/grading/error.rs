use axum::http::StatusCode;
use thiserror::Error;

/// Failure taxonomy for the grading workflow. Converted to the
/// `(StatusCode, String)` rejection tuple at the route boundary.
#[derive(Debug, Error)]
pub enum GradingError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    LimitExceeded(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<GradingError> for (StatusCode, String) {
    fn from(err: GradingError) -> Self {
        let status = match &err {
            GradingError::NotFound(_) => StatusCode::NOT_FOUND,
            GradingError::Forbidden(_) => StatusCode::FORBIDDEN,
            GradingError::Validation(_)
            | GradingError::InvalidOperation(_)
            | GradingError::LimitExceeded(_) => StatusCode::BAD_REQUEST,
            GradingError::InvalidState(_) | GradingError::Conflict(_) => StatusCode::CONFLICT,
            GradingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, err.to_string())
    }
}
