use super::predictor::{PerformancePredictor, clamp_prediction};
use super::regressor::ModelArtifacts;
use crate::domain::errors::{ArtifactError, PredictionError};
use crate::domain::ml::{engineer_features, select_features};
use crate::domain::records::StudentInputs;
use tracing::{debug, info};

/// Serves predictions from trained artifacts: engineer the 15 features, keep
/// the persisted feature list in order, standardize, run the regressor and
/// clamp into [0, 100].
#[derive(Debug)]
pub struct SmartCorePredictor {
    artifacts: ModelArtifacts,
}

impl SmartCorePredictor {
    pub fn new(artifacts: ModelArtifacts) -> Result<Self, ArtifactError> {
        artifacts.validate()?;
        info!(
            "Loaded {} model with {} features",
            artifacts.model.display_name(),
            artifacts.feature_names.len()
        );
        Ok(Self { artifacts })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.artifacts.feature_names
    }

    fn prepare_row(&self, inputs: &StudentInputs) -> Result<Vec<f64>, PredictionError> {
        let engineered = engineer_features(inputs);
        let selected = select_features(&engineered, &self.artifacts.feature_names)?;
        self.artifacts.scaler.transform_row(&selected)
    }
}

impl PerformancePredictor for SmartCorePredictor {
    fn predict(&self, inputs: &StudentInputs) -> Result<f64, PredictionError> {
        let raw = self
            .predict_batch(std::slice::from_ref(inputs))?
            .into_iter()
            .next()
            .ok_or(PredictionError::EmptyPrediction)?;
        debug!("Predicted {:.4} for {:?}", raw, inputs);
        Ok(raw)
    }

    fn predict_batch(&self, inputs: &[StudentInputs]) -> Result<Vec<f64>, PredictionError> {
        let rows = inputs
            .iter()
            .map(|i| self.prepare_row(i))
            .collect::<Result<Vec<_>, _>>()?;

        let raw = self
            .artifacts
            .model
            .predict(&rows)
            .map_err(|e| PredictionError::Inference {
                reason: e.to_string(),
            })?;

        raw.into_iter().map(clamp_prediction).collect()
    }

    fn name(&self) -> &str {
        self.artifacts.model.display_name()
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }
}
