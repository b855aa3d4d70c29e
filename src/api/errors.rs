use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::dto::MessageDto;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Device not found")]
    NotFound,

    /// Request body could not be parsed into a patch.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Backend failure on a read; always reported as 500.
    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Reads never reject client input, so every store error is a server error.
    pub fn read_failure(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Store(StoreError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Store(StoreError::Unavailable(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Store request failed");
        }
        let body = Json(MessageDto {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
