use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::query::QueryError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Unavailable(&'static str, String),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::NotFound(epoch) => ApiError::NotFound(epoch),
            QueryError::EmptyDataset => ApiError::Unavailable("empty_dataset", e.to_string()),
            QueryError::DataUnavailable => {
                ApiError::Unavailable("dataset_unavailable", e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(epoch) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message(
                    "epoch_not_found",
                    &format!("no state vector at epoch {}", epoch),
                )),
            )
                .into_response(),
            ApiError::Unavailable(reason, msg) => {
                log::error!("Serving 503: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::with_message(reason, &msg)),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
