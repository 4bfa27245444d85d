use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::r2d2::PoolError;
use thiserror::Error;

use crate::models::Response;

/// Failures coming out of the persistence layer. All of them end up as 500.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("database task was cancelled: {0}")]
    Blocking(#[from] BlockingError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("todo {0} not found")]
    NotFound(i32),
    /// A request body rejected before parsing, with the status actix assigns.
    #[error("{message}")]
    Payload { status: StatusCode, message: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<BlockingError> for ApiError {
    fn from(value: BlockingError) -> Self {
        ApiError::Storage(StorageError::Blocking(value))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Payload { status, .. } => *status,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        HttpResponse::build(status).json(Response {
            message: self.to_string(),
        })
    }
}
