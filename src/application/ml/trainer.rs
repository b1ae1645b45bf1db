//! Offline training pipeline.
//!
//! dataset → synthetic edge cases → engineered features → standard scaler →
//! seeded train/test split → regressor fit → metrics, cross-validation and
//! permutation importances → artifacts.

use super::evaluation::{
    CrossValidation, FeatureImportance, RegressionMetrics, cross_validate, permutation_importance,
};
use super::regressor::{Algorithm, ModelArtifacts, RegressorModel};
use crate::config::TrainingConfig;
use crate::domain::ml::feature_registry::default_feature_names;
use crate::domain::ml::synthetic::augment;
use crate::domain::ml::{StandardScaler, engineer_features};
use crate::domain::records::PerformanceSample;
use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::info;

/// Number of permutation importances kept in the report
pub const TOP_FEATURES: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub algorithm: Algorithm,
    pub base_rows: usize,
    pub synthetic_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train: RegressionMetrics,
    pub test: RegressionMetrics,
    pub cross_validation: Option<CrossValidation>,
    pub top_features: Vec<FeatureImportance>,
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifacts: ModelArtifacts,
    pub report: TrainingReport,
}

/// Engineered feature rows and targets, in sample order.
pub fn build_feature_matrix(samples: &[PerformanceSample]) -> (Vec<Vec<f64>>, Vec<f64>) {
    samples
        .iter()
        .map(|s| (engineer_features(&s.inputs).to_vec(), s.performance_index))
        .unzip()
}

/// Shuffled `(train, test)` row indices. The test side gets
/// `ceil(n * test_size)` rows and the train side at least one.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if n < 2 {
        bail!("Need at least 2 rows to split, got {}", n);
    }
    let n_test = ((n as f64 * test_size).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = indices.split_off(n_test);
    Ok((train, indices))
}

pub fn fit_model(config: &TrainingConfig, x: &[Vec<f64>], y: &[f64]) -> Result<RegressorModel> {
    match config.algorithm {
        Algorithm::GradientBoosting => {
            RegressorModel::fit_gradient_boosting(x, y, &config.gradient_boosting)
        }
        Algorithm::RandomForest => RegressorModel::fit_random_forest(x, y, &config.random_forest),
    }
}

fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}

pub fn train(base: &[PerformanceSample], config: &TrainingConfig) -> Result<TrainingOutcome> {
    config.validate()?;

    let samples = if config.synthetic {
        augment(base)
    } else {
        base.to_vec()
    };
    let synthetic_rows = samples.len() - base.len();
    info!(
        "Training on {} rows ({} base, {} synthetic)",
        samples.len(),
        base.len(),
        synthetic_rows
    );

    let (raw_x, y) = build_feature_matrix(&samples);
    let scaler = StandardScaler::fit(&raw_x);
    let x = scaler
        .transform(&raw_x)
        .context("Failed to standardize features")?;

    let (train_idx, test_idx) = train_test_split(x.len(), config.test_size, config.seed)?;
    let (x_train, y_train) = (pick(&x, &train_idx), pick(&y, &train_idx));
    let (x_test, y_test) = (pick(&x, &test_idx), pick(&y, &test_idx));

    info!("Fitting {} on {} rows", config.algorithm, x_train.len());
    let model = fit_model(config, &x_train, &y_train)
        .with_context(|| format!("Failed to fit {}", config.algorithm))?;

    let train_metrics = RegressionMetrics::compute(&model.predict(&x_train)?, &y_train);
    let test_metrics = RegressionMetrics::compute(&model.predict(&x_test)?, &y_test);
    info!(
        "Test R² {:.4}, MSE {:.4}, MAE {:.4}",
        test_metrics.r2, test_metrics.mse, test_metrics.mae
    );

    let cross_validation = if config.cv_folds >= 2 {
        info!("Running {}-fold cross-validation", config.cv_folds);
        let cv = cross_validate(&x, &y, config.cv_folds, config.seed, |xt, yt, xv| {
            fit_model(config, xt, yt)?.predict(xv)
        })?;
        Some(cv)
    } else {
        None
    };

    let feature_names = default_feature_names();
    let mut top_features =
        permutation_importance(&model, &x_test, &y_test, &feature_names, config.seed)?;
    top_features.truncate(TOP_FEATURES);

    let report = TrainingReport {
        algorithm: config.algorithm,
        base_rows: base.len(),
        synthetic_rows,
        train_rows: x_train.len(),
        test_rows: x_test.len(),
        train: train_metrics,
        test: test_metrics,
        cross_validation,
        top_features,
    };

    Ok(TrainingOutcome {
        artifacts: ModelArtifacts {
            model,
            scaler,
            feature_names,
        },
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::FEATURE_COUNT;
    use crate::domain::records::StudentInputs;

    fn fixture() -> Vec<PerformanceSample> {
        (0..60u32)
            .map(|i| {
                let inputs = StudentInputs::new(i % 10, 40 + i, i % 3 == 0, 5 + i % 4, i % 9);
                let index = inputs.hours_studied as f64 * 2.8 + inputs.previous_scores as f64 * 0.9
                    - 30.0;
                PerformanceSample::new(inputs, index)
            })
            .collect()
    }

    fn quick_config() -> TrainingConfig {
        let mut config = TrainingConfig {
            synthetic: false,
            cv_folds: 3,
            ..Default::default()
        };
        config.gradient_boosting.n_estimators = 40;
        config.gradient_boosting.learning_rate = 0.2;
        config.gradient_boosting.max_depth = 3;
        config
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = train_test_split(100, 0.15, 42).unwrap();
        assert_eq!(test.len(), 15);
        assert_eq!(train.len(), 85);

        let (train, test) = train_test_split(2, 0.9, 42).unwrap();
        assert_eq!((train.len(), test.len()), (1, 1));
        assert!(train_test_split(1, 0.15, 42).is_err());
    }

    #[test]
    fn test_split_is_seeded() {
        assert_eq!(
            train_test_split(50, 0.2, 7).unwrap(),
            train_test_split(50, 0.2, 7).unwrap()
        );
        assert_ne!(
            train_test_split(50, 0.2, 7).unwrap(),
            train_test_split(50, 0.2, 8).unwrap()
        );
    }

    #[test]
    fn test_feature_matrix_shape() {
        let (x, y) = build_feature_matrix(&fixture());
        assert_eq!(x.len(), 60);
        assert_eq!(y.len(), 60);
        assert!(x.iter().all(|row| row.len() == FEATURE_COUNT));
    }

    #[test]
    fn test_train_produces_consistent_artifacts_and_report() {
        let outcome = train(&fixture(), &quick_config()).unwrap();

        assert!(outcome.artifacts.validate().is_ok());
        assert_eq!(outcome.artifacts.feature_names.len(), FEATURE_COUNT);

        let report = outcome.report;
        assert_eq!(report.base_rows, 60);
        assert_eq!(report.synthetic_rows, 0);
        assert_eq!(report.train_rows + report.test_rows, 60);
        assert_eq!(report.test_rows, 9);
        assert!(report.train.r2 > 0.8, "train r2 {}", report.train.r2);
        assert_eq!(report.cross_validation.unwrap().fold_r2.len(), 3);
        assert_eq!(report.top_features.len(), TOP_FEATURES);
    }

    #[test]
    fn test_cross_validation_can_be_disabled() {
        let config = TrainingConfig {
            cv_folds: 0,
            algorithm: Algorithm::RandomForest,
            random_forest: crate::application::ml::regressor::RandomForestParams {
                n_trees: 10,
                max_depth: 5,
                min_samples_split: 2,
            },
            ..quick_config()
        };
        let outcome = train(&fixture(), &config).unwrap();
        assert!(outcome.report.cross_validation.is_none());
        assert_eq!(outcome.artifacts.model.algorithm(), Algorithm::RandomForest);
    }
}
