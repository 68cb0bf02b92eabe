use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Which of the two external stores still holds a record after a
/// partially-failed dual write or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSide {
    CredentialAuthority,
    DocumentStore,
}

impl std::fmt::Display for StoreSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreSide::CredentialAuthority => write!(f, "credential authority"),
            StoreSide::DocumentStore => write!(f, "document store"),
        }
    }
}

/// Every failure a request can surface. Middleware failures short-circuit
/// before the handler runs; the rest are translated at the handler boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing authentication token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("password mismatch")]
    PasswordMismatch,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("partial delete: record still present in {surviving}")]
    PartialDeleteFailure { surviving: StoreSide },
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("malformed password hash")]
    InvalidHashFormat,
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::PasswordMismatch => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::PartialDeleteFailure { .. }
            | ApiError::BackendUnavailable(_)
            | ApiError::InvalidHashFormat
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable discriminant exposed in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "missing_token",
            ApiError::InvalidToken => "invalid_token",
            ApiError::NotFound(_) => "not_found",
            ApiError::DuplicateEmail => "duplicate_email",
            ApiError::PasswordMismatch => "password_mismatch",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::PartialDeleteFailure { .. } => "partial_delete_failure",
            ApiError::BackendUnavailable(_) => "backend_unavailable",
            ApiError::InvalidHashFormat => "invalid_hash_format",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound => ApiError::NotFound("record"),
            BackendError::DuplicateEmail => ApiError::DuplicateEmail,
            BackendError::Unavailable(msg) => ApiError::BackendUnavailable(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        }
        let body = Json(json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));
        (status, body).into_response()
    }
}
