//! Training hyperparameters, loaded from an optional TOML file.
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ```toml
//! algorithm = "gradient-boosting"
//! test_size = 0.15
//!
//! [gradient_boosting]
//! n_estimators = 300
//! ```

use crate::application::ml::gradient_boosting::GradientBoostingParams;
use crate::application::ml::regressor::{Algorithm, RandomForestParams};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub algorithm: Algorithm,
    /// Fraction of rows held out for the test split
    pub test_size: f64,
    /// Seed for the train/test shuffle and the cross-validation folds
    pub seed: u64,
    /// Number of cross-validation folds; 0 disables cross-validation
    pub cv_folds: usize,
    /// Append the synthetic edge cases to the base dataset
    pub synthetic: bool,
    pub gradient_boosting: GradientBoostingParams,
    pub random_forest: RandomForestParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::GradientBoosting,
            test_size: 0.15,
            seed: 42,
            cv_folds: 5,
            synthetic: true,
            gradient_boosting: GradientBoostingParams::default(),
            random_forest: RandomForestParams::default(),
        }
    }
}

impl TrainingConfig {
    /// Parses a TOML config. The top-level `seed` also seeds boosting unless
    /// `[gradient_boosting]` sets its own, matching what `--seed` does.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(raw).context("Failed to parse training config")?;
        let boosting_seed_set = table
            .get("gradient_boosting")
            .and_then(|section| section.get("seed"))
            .is_some();

        let mut config: Self = toml::Value::Table(table)
            .try_into()
            .context("Failed to parse training config")?;
        if !boosting_seed_set {
            config.gradient_boosting.seed = config.seed;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read training config {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("test_size must be in (0, 1), got {}", self.test_size);
        }
        if self.cv_folds == 1 {
            bail!("cv_folds must be 0 (disabled) or at least 2");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_pipeline() {
        let config = TrainingConfig::default();
        assert_eq!(config.algorithm, Algorithm::GradientBoosting);
        assert_eq!(config.test_size, 0.15);
        assert_eq!(config.cv_folds, 5);
        assert_eq!(config.gradient_boosting.n_estimators, 500);
        assert_eq!(config.gradient_boosting.max_depth, 7);
        assert_eq!(config.random_forest.n_trees, 100);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrainingConfig::from_toml_str(
            r#"
            algorithm = "random-forest"
            synthetic = false

            [gradient_boosting]
            n_estimators = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.algorithm, Algorithm::RandomForest);
        assert!(!config.synthetic);
        assert_eq!(config.gradient_boosting.n_estimators, 50);
        assert_eq!(config.gradient_boosting.learning_rate, 0.05);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_top_level_seed_reaches_boosting() {
        let config = TrainingConfig::from_toml_str("seed = 7").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.gradient_boosting.seed, 7);

        let explicit = TrainingConfig::from_toml_str(
            r#"
            seed = 7

            [gradient_boosting]
            seed = 3
            "#,
        )
        .unwrap();
        assert_eq!(explicit.seed, 7);
        assert_eq!(explicit.gradient_boosting.seed, 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(TrainingConfig::from_toml_str("test_size = 1.5").is_err());
        assert!(TrainingConfig::from_toml_str("cv_folds = 1").is_err());
        assert!(TrainingConfig::from_toml_str("algorithm = \"svm\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.toml");
        fs::write(&path, "seed = 7\ncv_folds = 0\n").unwrap();

        let config = TrainingConfig::load(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.gradient_boosting.seed, 7);
        assert_eq!(config.cv_folds, 0);
        assert!(TrainingConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
