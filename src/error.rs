use crate::mapper::ConversionError;
use crate::upstream::UpstreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing 'id' query parameter")]
    MissingAppId,

    #[error("Invalid 'id' query parameter: {0:?}")]
    InvalidAppId(String),

    #[error("Invalid 'hours' parameter: {0:?}")]
    InvalidHours(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingAppId | AppError::InvalidAppId(_) | AppError::InvalidHours(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Upstream(_) | AppError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
