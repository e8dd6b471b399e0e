//! Error types shared by the record store, the repositories and the API.
//!
//! Every failure maps onto one of three classes: validation (400),
//! missing record (404) or storage (500).

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Build a validation error naming every missing required field
    pub fn missing_fields(fields: &[&str]) -> Self {
        let verb = if fields.len() == 1 { "is" } else { "are" };
        AppError::Validation(format!("{} {} required", fields.join(", "), verb))
    }

    pub fn not_found(entity: &'static str, id: &str) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for server-side failures (backing files or the blocking task
    /// running them) rather than problems with the request
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Io(_) | AppError::Json(_) | AppError::Task(_))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(msg) => {
                debug!(error = %msg, "Rejected request");
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { entity, id } => {
                debug!(entity = %entity, id = %id, "Record not found");
                StatusCode::NOT_FOUND
            }
            AppError::Io(e) => {
                error!(error = %e, "Storage I/O failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Json(e) => {
                error!(error = %e, "Stored collection could not be decoded");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Task(e) => {
                error!(error = %e, "Storage task did not complete");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(MessageBody::new(message))).into_response()
    }
}
