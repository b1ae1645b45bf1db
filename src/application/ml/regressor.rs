use super::gradient_boosting::{GradientBoostingParams, GradientBoostingRegressor, to_matrix};
use crate::domain::errors::{ArtifactError, PredictionError};
use crate::domain::ml::StandardScaler;
use crate::domain::ml::feature_registry::feature_index;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use std::str::FromStr;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Regression algorithm used by the trainer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    GradientBoosting,
    RandomForest,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::GradientBoosting => write!(f, "gradient-boosting"),
            Algorithm::RandomForest => write!(f, "random-forest"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "gradient-boosting" | "gbdt" => Ok(Algorithm::GradientBoosting),
            "random-forest" | "forest" => Ok(Algorithm::RandomForest),
            _ => anyhow::bail!(
                "Invalid algorithm: {}. Must be 'gradient-boosting' or 'random-forest'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_split: usize,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
        }
    }
}

/// A fitted regressor, serialized as `model.json`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressorModel {
    GradientBoosting(GradientBoostingRegressor),
    RandomForest(ForestModel),
}

impl fmt::Debug for RegressorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressorModel::GradientBoosting(model) => fmt::Debug::fmt(model, f),
            RegressorModel::RandomForest(_) => f.write_str("RandomForestRegressor"),
        }
    }
}

impl RegressorModel {
    pub fn fit_gradient_boosting(
        x: &[Vec<f64>],
        y: &[f64],
        params: &GradientBoostingParams,
    ) -> Result<Self> {
        GradientBoostingRegressor::fit(x, y, params).map(RegressorModel::GradientBoosting)
    }

    pub fn fit_random_forest(
        x: &[Vec<f64>],
        y: &[f64],
        params: &RandomForestParams,
    ) -> Result<Self> {
        let x_matrix = to_matrix(x)?;
        let forest_params = RandomForestRegressorParameters::default()
            .with_n_trees(params.n_trees)
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split);
        let model = RandomForestRegressor::fit(&x_matrix, &y.to_vec(), forest_params)
            .map_err(|e| anyhow!("Training error: {}", e))?;
        Ok(RegressorModel::RandomForest(model))
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        match self {
            RegressorModel::GradientBoosting(model) => model.predict(x),
            RegressorModel::RandomForest(model) => {
                if x.is_empty() {
                    return Ok(Vec::new());
                }
                model
                    .predict(&to_matrix(x)?)
                    .map_err(|e| anyhow!("Predict error: {}", e))
            }
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            RegressorModel::GradientBoosting(_) => Algorithm::GradientBoosting,
            RegressorModel::RandomForest(_) => Algorithm::RandomForest,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RegressorModel::GradientBoosting(_) => "Gradient Boosting (Huber)",
            RegressorModel::RandomForest(_) => "SmartCore Random Forest",
        }
    }
}

/// Everything inference needs: the model plus the exact feature pipeline it
/// was trained with.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub model: RegressorModel,
    pub scaler: StandardScaler,
    pub feature_names: Vec<String>,
}

impl ModelArtifacts {
    /// Checks that the scaler width matches the feature list and that every
    /// feature name is one the registry can produce.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.scaler.n_features() != self.feature_names.len() {
            return Err(ArtifactError::Inconsistent {
                reason: format!(
                    "scaler has {} features, feature list has {}",
                    self.scaler.n_features(),
                    self.feature_names.len()
                ),
            });
        }
        if let Some(unknown) = self
            .feature_names
            .iter()
            .find(|name| feature_index(name).is_none())
        {
            return Err(ArtifactError::Inconsistent {
                reason: PredictionError::UnknownFeature {
                    name: unknown.clone(),
                }
                .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_registry::default_feature_names;

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!(
            Algorithm::from_str("gradient_boosting").unwrap(),
            Algorithm::GradientBoosting
        );
        assert_eq!(
            Algorithm::from_str("Random-Forest").unwrap(),
            Algorithm::RandomForest
        );
        assert!(Algorithm::from_str("svm").is_err());
        assert_eq!(Algorithm::RandomForest.to_string(), "random-forest");
    }

    #[test]
    fn test_random_forest_fits_and_predicts() {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, 1.0]).collect();
        let y: Vec<f64> = (0..40).map(|i| i as f64 * 3.0).collect();
        let params = RandomForestParams {
            n_trees: 10,
            max_depth: 6,
            min_samples_split: 2,
        };

        let model = RegressorModel::fit_random_forest(&x, &y, &params).unwrap();
        assert_eq!(model.algorithm(), Algorithm::RandomForest);
        let pred = model.predict(&[vec![20.0, 1.0]]).unwrap();
        assert!((pred[0] - 60.0).abs() < 15.0);
        assert!(model.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_artifact_validation() {
        let x = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let artifacts = ModelArtifacts {
            model: RegressorModel::fit_gradient_boosting(
                &x,
                &[1.0, 2.0],
                &GradientBoostingParams {
                    n_estimators: 1,
                    min_samples_split: 2,
                    min_samples_leaf: 1,
                    ..Default::default()
                },
            )
            .unwrap(),
            scaler: StandardScaler::fit(&x),
            feature_names: vec!["hours_studied".into(), "sleep_hours".into()],
        };
        assert!(artifacts.validate().is_ok());

        let mismatched = ModelArtifacts {
            feature_names: default_feature_names(),
            ..artifacts
        };
        assert!(matches!(
            mismatched.validate(),
            Err(ArtifactError::Inconsistent { .. })
        ));
    }
}
