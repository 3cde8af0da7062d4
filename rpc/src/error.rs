//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("facility not found: {0}")]
    FacilityNotFound(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<kerb_store::StoreError> for RpcError {
    fn from(e: kerb_store::StoreError) -> Self {
        match e {
            kerb_store::StoreError::NotFound(key) => RpcError::FacilityNotFound(key),
            other => RpcError::Store(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: String,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RpcError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            RpcError::FacilityNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            RpcError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            RpcError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error"),
        };
        let body = ErrorBody {
            error: self.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
