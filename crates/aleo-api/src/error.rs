use aleo_prometheus::EncodeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("scrape cancelled")]
    Cancelled,

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Cancelled => {
                warn!("scrape cancelled before completion");
                status.into_response()
            }
            ApiError::Encode(err) => {
                error!(error = %err, "failed to encode metrics");
                (status, format!("failed to encode metrics: {err}\n")).into_response()
            }
        }
    }
}
