//! Request handlers for the prediction and record endpoints.

use super::AppState;
use super::error::{ApiError, NO_RECORDS, RECORD_NOT_FOUND};
use crate::domain::records::{PerformanceRecord, StudentInputs};
use crate::domain::statistics::{RecordStatistics, round2};
use crate::domain::validation::{validate_prediction_request, validate_record_payload};
use crate::infrastructure::observability::metrics::{operation, outcome};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_performance_index: f64,
    pub input_features: StudentInputs,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model: Option<ModelInfo>,
}

/// An empty body reads as an empty object so every field reports as missing.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedJson(e.to_string()))
}

/// Ids that are not integers can never match a record.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::NotFound(RECORD_NOT_FOUND))
}

/// `POST /api/predict/`
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let _timer = state.metrics.start_prediction_timer();

    let result = run_prediction(&state, &body);
    let label = match &result {
        Ok(_) => outcome::SUCCESS,
        Err(ApiError::ModelNotLoaded) => outcome::MODEL_MISSING,
        Err(ApiError::Validation(_)) | Err(ApiError::MalformedJson(_)) => outcome::INVALID,
        Err(_) => outcome::ERROR,
    };
    state.metrics.inc_predictions(label);

    result.map(Json)
}

fn run_prediction(state: &AppState, body: &Bytes) -> Result<PredictionResponse, ApiError> {
    let predictor = state.predictor.as_ref().ok_or(ApiError::ModelNotLoaded)?;
    let payload = parse_body(body)?;
    let inputs = validate_prediction_request(&payload).map_err(ApiError::Validation)?;

    let prediction = predictor.predict(&inputs)?;
    debug!("Predicted {:.2} for {:?}", prediction, inputs);

    Ok(PredictionResponse {
        predicted_performance_index: round2(prediction),
        input_features: inputs,
    })
}

/// `GET /api/records/`
pub async fn list_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PerformanceRecord>>, ApiError> {
    Ok(Json(state.repository.get_all().await?))
}

/// `POST /api/records/create/`
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<PerformanceRecord>), ApiError> {
    let payload = parse_body(&body)?;
    let sample = validate_record_payload(&payload).map_err(ApiError::Validation)?;

    let record = state.repository.create(&sample).await?;
    state.metrics.inc_mutations(operation::CREATE);
    info!("Created record {} ({})", record.id, record);

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/records/:id/`
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PerformanceRecord>, ApiError> {
    let id = parse_id(&id)?;
    state
        .repository
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(RECORD_NOT_FOUND))
}

/// `PUT /api/records/:id/`
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PerformanceRecord>, ApiError> {
    let id = parse_id(&id)?;
    if state.repository.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound(RECORD_NOT_FOUND));
    }

    let payload = parse_body(&body)?;
    let sample = validate_record_payload(&payload).map_err(ApiError::Validation)?;

    let record = state
        .repository
        .update(id, &sample)
        .await?
        .ok_or(ApiError::NotFound(RECORD_NOT_FOUND))?;
    state.metrics.inc_mutations(operation::UPDATE);
    info!("Updated record {}", record.id);

    Ok(Json(record))
}

/// `DELETE /api/records/:id/`
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.repository.delete(id).await? {
        return Err(ApiError::NotFound(RECORD_NOT_FOUND));
    }
    state.metrics.inc_mutations(operation::DELETE);
    info!("Deleted record {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/statistics/`
pub async fn statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecordStatistics>, ApiError> {
    let records = state.repository.get_all().await?;
    RecordStatistics::from_records(&records)
        .map(Json)
        .ok_or(ApiError::NotFound(NO_RECORDS))
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.predictor.is_some(),
        model: state.predictor.as_ref().map(|p| ModelInfo {
            name: p.name().to_string(),
            version: p.version().to_string(),
        }),
    })
}
