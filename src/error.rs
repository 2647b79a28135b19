use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum TempleError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    DuplicateKey(String),

    #[error("Item catalog is empty")]
    CatalogEmpty,

    #[error("{0}")]
    Validation(String),

    #[error("Login required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Application is not activated; create the admin account first")]
    SetupRequired,

    #[error("Application is already activated")]
    AlreadyActivated,

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TempleError {
    /// Maps a unique-constraint violation on insert to `DuplicateKey(what)`.
    pub fn from_insert(e: SqlxError, what: impl Into<String>) -> Self {
        match &e {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                TempleError::DuplicateKey(what.into())
            }
            _ => TempleError::Database(e),
        }
    }
}

impl IntoResponse for TempleError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            TempleError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            TempleError::DuplicateKey(_) => (StatusCode::CONFLICT, "DUPLICATE_KEY"),
            TempleError::CatalogEmpty => (StatusCode::SERVICE_UNAVAILABLE, "CATALOG_EMPTY"),
            TempleError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            TempleError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            TempleError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            TempleError::SetupRequired => (StatusCode::FORBIDDEN, "SETUP_REQUIRED"),
            TempleError::AlreadyActivated => (StatusCode::CONFLICT, "ALREADY_ACTIVATED"),
            TempleError::Database(_) | TempleError::PasswordHash(_) | TempleError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };

        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
