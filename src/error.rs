use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("No prediction to update")]
    NoPrediction,
    #[error("An entry already exists for {0}")]
    DateTaken(NaiveDate),
    #[error("Invalid input: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PredictionError {
    #[error("Insufficient data for prediction")]
    InsufficientData,
    #[error("Predicted dates fall outside the supported calendar")]
    DateOutOfRange,
}

/// Error returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Unable to generate prediction: {0}")]
    Prediction(#[from] PredictionError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::NotFound { .. } | StoreError::NoPrediction) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::DateTaken(_)) => StatusCode::CONFLICT,
            ApiError::Store(StoreError::Invalid(_)) | ApiError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("⚠️ {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
