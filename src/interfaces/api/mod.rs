//! REST/JSON interface. Every path keeps its trailing slash.

pub mod error;
pub mod handlers;

use crate::application::ml::PerformancePredictor;
use crate::domain::repositories::PerformanceRecordRepository;
use crate::infrastructure::observability::Metrics;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

pub use error::ApiError;

/// Shared, read-only handler state
pub struct AppState {
    pub repository: Arc<dyn PerformanceRecordRepository>,
    /// `None` when the artifacts were missing or unreadable at startup
    pub predictor: Option<Arc<dyn PerformancePredictor>>,
    pub metrics: Metrics,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/predict/", post(handlers::predict))
        .route("/api/records/", get(handlers::list_records))
        .route("/api/records/create/", post(handlers::create_record))
        .route(
            "/api/records/:id/",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .route("/api/statistics/", get(handlers::statistics))
        .route("/health", get(handlers::health))
        .with_state(state)
}
