use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning inputs into a Performance Index
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Unknown feature in model feature list: {name}")]
    UnknownFeature { name: String },

    #[error("Feature count mismatch: scaler expects {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("Inference failed: {reason}")]
    Inference { reason: String },

    #[error("No prediction returned")]
    EmptyPrediction,
}

/// Errors related to the persisted model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Inconsistent artifacts: {reason}")]
    Inconsistent { reason: String },
}

/// Errors related to reading the training dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Malformed dataset row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_formatting() {
        let error = PredictionError::FeatureCountMismatch {
            expected: 15,
            actual: 5,
        };

        let msg = error.to_string();
        assert!(msg.contains("15"));
        assert!(msg.contains("5"));
    }

    #[test]
    fn test_artifact_error_names_path() {
        let error = ArtifactError::Missing {
            path: PathBuf::from("data/model/model.json"),
        };
        assert!(error.to_string().contains("data/model/model.json"));
    }

    #[test]
    fn test_dataset_row_error_formatting() {
        let error = DatasetError::MalformedRow {
            row: 3,
            reason: "Extracurricular Activities must be Yes or No".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed dataset row 3: Extracurricular Activities must be Yes or No"
        );
    }
}
