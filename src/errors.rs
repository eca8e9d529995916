use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::storage::StorageError;

/// Erreurs renvoyées par les routes. Chaque variante correspond à un code HTTP ;
/// le corps JSON est toujours de la forme {"error": "..."}.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid {context}")]
    Validation {
        context: &'static str,
        errors: ValidationErrors,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn validation(context: &'static str, errors: ValidationErrors) -> Self {
        AppError::Validation { context, errors }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::Validation { errors, .. } => HttpResponse::build(status).json(json!({
                "error": self.to_string(),
                "details": errors
            })),
            AppError::Storage(StorageError::NotFound { .. }) => {
                log::debug!("{}", self);
                HttpResponse::build(status).json(json!({ "error": self.to_string() }))
            }
            AppError::Storage(e) => {
                // Le détail reste dans les logs serveur
                log::error!("Internal error: {}", e);
                HttpResponse::build(status).json(json!({ "error": "Internal server error" }))
            }
            _ => HttpResponse::build(status).json(json!({ "error": self.to_string() })),
        }
    }
}
