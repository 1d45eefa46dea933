use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

/// Failures surfaced by the query service and returned to API callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{operation}: {detail}")]
    Conflict {
        operation: &'static str,
        detail: String,
    },

    #[error("{0}: record store unavailable")]
    StoreUnavailable(&'static str),

    /// Any other store failure. Carries only the entity-scoped message; the
    /// underlying detail is logged, not returned.
    #[error("{0}")]
    Operation(&'static str),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// `operation` reads like "Failed to create employee".
    pub fn from_store(err: StoreError, operation: &'static str) -> Self {
        match err {
            StoreError::Duplicate(detail) => {
                warn!(error = %detail, operation, "Unique key conflict");
                ServiceError::Conflict { operation, detail }
            }
            StoreError::Unavailable(detail) => {
                error!(error = %detail, operation, "Record store unavailable");
                ServiceError::StoreUnavailable(operation)
            }
            StoreError::Database(detail) => {
                error!(error = %detail, operation, "Record store failure");
                ServiceError::Operation(operation)
            }
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Operation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}
