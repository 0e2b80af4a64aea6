//! HTTP error responses

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use climate_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable code for programmatic handling
    pub error: String,
    pub message: String,
}

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Query string that does not deserialize
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("No route for {0}")]
    RouteNotFound(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidQuery(rejection.body_text())
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Storage(StorageError::InvalidArgument(_)) | AppError::InvalidQuery(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
            }
            AppError::Storage(StorageError::DataUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "DATA_UNAVAILABLE")
            }
            AppError::Storage(StorageError::QueryFailure(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "QUERY_FAILURE")
            }
            AppError::RouteNotFound(_) => (StatusCode::NOT_FOUND, "ROUTE_NOT_FOUND"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }

        let body = ApiError {
            error: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
