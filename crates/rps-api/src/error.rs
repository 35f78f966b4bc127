use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rps_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the logs
        let message = match &self {
            Self::Store(e) => {
                tracing::error!(error = %e, "Storage failure");
                "Failed to access progress data".to_string()
            }
            Self::Task(e) => {
                tracing::error!(error = %e, "Storage task failed");
                "Failed to access progress data".to_string()
            }
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
