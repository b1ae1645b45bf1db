use crate::domain::errors::PredictionError;
use crate::domain::validation::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const MODEL_NOT_FOUND: &str = "Model not found. Please train the model first.";
pub const RECORD_NOT_FOUND: &str = "Record not found";
pub const NO_RECORDS: &str = "No records found in database";

/// Every failure an API handler can surface, mapped onto a status code and
/// a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("JSON parse error - {0}")]
    MalformedJson(String),

    #[error("{}", MODEL_NOT_FOUND)]
    ModelNotLoaded,

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ModelNotLoaded | ApiError::Prediction(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::MalformedJson(_) => json!({ "detail": self.to_string() }),
            ApiError::Storage(cause) => {
                error!("Storage failure: {:#}", cause);
                json!({ "error": "Internal server error" })
            }
            ApiError::Prediction(cause) => {
                error!("Prediction failed: {}", cause);
                json!({ "error": self.to_string() })
            }
            ApiError::ModelNotLoaded | ApiError::NotFound(_) => {
                json!({ "error": self.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
