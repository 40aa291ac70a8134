use axum::extract::multipart::MultipartError;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use indexer::error::ErrorKind;
use indexer::IndexError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    /// Status, category code, and client-facing message. Internal details
    /// are logged here and never returned.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Index(err) => {
                let status = match (err.kind(), err) {
                    (ErrorKind::InvalidInput, _) => StatusCode::BAD_REQUEST,
                    (ErrorKind::NotFound, _) => StatusCode::NOT_FOUND,
                    (ErrorKind::ResourceGuard, IndexError::UploadTooLarge { .. }) => {
                        StatusCode::PAYLOAD_TOO_LARGE
                    }
                    (ErrorKind::ResourceGuard, _) => StatusCode::BAD_REQUEST,
                    (ErrorKind::Internal, _) => {
                        tracing::error!("Indexer error: {}", err);
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            err.code(),
                            "An internal error occurred".to_string(),
                        );
                    }
                };
                (status, err.code(), err.to_string())
            }
            ApiError::Multipart(err) => (err.status(), "BAD_REQUEST", self.to_string()),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string()),
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (
            status,
            Json(json!({
                "success": false,
                "error": message,
                "code": code,
            })),
        )
            .into_response()
    }
}
