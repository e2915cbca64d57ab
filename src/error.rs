//! Error handling module
//!
//! Centralized error types and HTTP response conversion.
//!
//! Every error body has the shape `{"Error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthRejection, CredentialError, TokenError};
use crate::domain::TransferError;
use crate::store::StoreError;

/// Body of every rejected token check
pub const PERMISSION_DENIED: &str = "permission denied";

const INTERNAL_ERROR: &str = "internal server error";

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("{0}")]
    InvalidRequest(String),

    #[error("not authenticated")]
    InvalidCredentials,

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Store(#[from] StoreError),

    // Server errors (5xx)
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::InvalidCredentials | AppError::Transfer(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Store(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Store(_)
            | AppError::Credential(_)
            | AppError::Token(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
            INTERNAL_ERROR.to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        // Same status and body for every reason.
        (StatusCode::FORBIDDEN, Json(ErrorResponse::new(PERMISSION_DENIED))).into_response()
    }
}
