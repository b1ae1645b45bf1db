use crate::domain::errors::PredictionError;
use crate::domain::records::StudentInputs;
use crate::domain::validation::PERFORMANCE_INDEX_RANGE;

/// Interface for Performance Index models
pub trait PerformancePredictor: Send + Sync {
    /// Predict the Performance Index for one student, clamped to [0, 100]
    fn predict(&self, inputs: &StudentInputs) -> Result<f64, PredictionError>;

    fn predict_batch(&self, inputs: &[StudentInputs]) -> Result<Vec<f64>, PredictionError> {
        inputs.iter().map(|i| self.predict(i)).collect()
    }

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// Clamps a raw regressor output into the Performance Index range.
/// NaN is an inference failure, not a score.
pub fn clamp_prediction(raw: f64) -> Result<f64, PredictionError> {
    if raw.is_nan() {
        return Err(PredictionError::Inference {
            reason: "model produced NaN".to_string(),
        });
    }
    let (lo, hi) = PERFORMANCE_INDEX_RANGE;
    Ok(raw.clamp(lo, hi))
}
