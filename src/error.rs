use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Engine error taxonomy. Business-rule failures are expected outcomes and
/// guarantee that no partial mutation was committed.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already enrolled in this subject")]
    AlreadyEnrolled,
    #[error("Insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: u64, required: u64 },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Storage conflict, retry the operation")]
    StorageConflict,
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl LedgerError {
    /// Stable machine-readable code for transport-layer mapping.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::NotFound(_) => "NOT_FOUND",
            LedgerError::AlreadyEnrolled => "ALREADY_ENROLLED",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::StorageConflict => "STORAGE_CONFLICT",
            LedgerError::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Ledger(LedgerError::Storage(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Ledger(err) => {
                let status = match &err {
                    LedgerError::Validation(_) | LedgerError::InvalidAmount(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
                    LedgerError::AlreadyEnrolled => StatusCode::CONFLICT,
                    LedgerError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
                    LedgerError::StorageConflict => StatusCode::SERVICE_UNAVAILABLE,
                    LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.code(), err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
