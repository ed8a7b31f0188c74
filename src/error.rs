// src/error.rs
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use tracing::{debug, error};

use crate::store::StoreError;

/// Why a credential was not accepted. Kept for logs only: every variant
/// is answered with the same 401 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingHeader,
    MalformedHeader,
    MalformedToken,
    BadSignature,
    Expired,
    NoSecret,
}

/// Why an authenticated caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAdmin,
    NotSelf,
}

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    Unauthorized(Rejection),
    Forbidden(Denial),
    SigningError(String),
    StoreError(StoreError),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        AppError::SigningError(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::SigningError(_) | AppError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::ValidationError(msg) => msg.as_str(),
            AppError::Unauthorized(reason) => {
                debug!(?reason, "credential rejected");
                "Unauthorized access"
            }
            AppError::Forbidden(reason) => {
                debug!(?reason, "access forbidden");
                "Unauthorized access"
            }
            AppError::SigningError(detail) => {
                error!(%detail, "token signing failed");
                "Error generating token"
            }
            AppError::StoreError(err) => {
                error!(error = %err, "document store failure");
                "Internal server error"
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreError(err)
    }
}
