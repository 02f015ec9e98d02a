//! RPC error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use disperse_asset::AssetError;
use disperse_engine::{DisperseError, ErrorKind};
use disperse_types::Address;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no token deployed at {0}")]
    UnknownAsset(Address),

    #[error(transparent)]
    Contract(#[from] DisperseError),

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("server error: {0}")]
    Server(String),
}

impl RpcError {
    /// Short machine-readable category echoed in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::InvalidRequest(_) | RpcError::Asset(_) => "input_validation",
            RpcError::UnknownAsset(_) => "not_found",
            RpcError::Contract(e) => match e.kind() {
                ErrorKind::InputValidation => "input_validation",
                ErrorKind::AllocationMismatch => "allocation_mismatch",
                ErrorKind::TransferFailure => "transfer_failure",
                ErrorKind::AllowanceFailure => "allowance_failure",
                ErrorKind::Internal => "internal",
            },
            RpcError::Server(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::InvalidRequest(_) | RpcError::Asset(_) => StatusCode::BAD_REQUEST,
            RpcError::UnknownAsset(_) => StatusCode::NOT_FOUND,
            RpcError::Contract(DisperseError::UnknownAsset(_)) => StatusCode::NOT_FOUND,
            RpcError::Contract(e) => match e.kind() {
                ErrorKind::InputValidation => StatusCode::BAD_REQUEST,
                ErrorKind::AllocationMismatch => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::AllowanceFailure => StatusCode::FORBIDDEN,
                ErrorKind::TransferFailure => StatusCode::CONFLICT,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RpcError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (self.status(), Json(body)).into_response()
    }
}
