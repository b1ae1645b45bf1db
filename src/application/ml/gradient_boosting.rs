//! Gradient boosted regression trees with Huber loss.
//!
//! Each stage fits a smartcore CART tree to the Huber pseudo-residuals of the
//! current ensemble on a random row subsample, then adds the shrunken tree
//! output to the running prediction. The initial estimate is the target
//! median, which is the Huber-optimal constant for large residuals.

use anyhow::{Result, anyhow, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::fmt;
use tracing::debug;

type Tree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientBoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of rows each stage is fitted on
    pub subsample: f64,
    /// Quantile of absolute residuals beyond which the loss turns linear
    pub huber_alpha: f64,
    pub seed: u64,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 500,
            learning_rate: 0.05,
            max_depth: 7,
            min_samples_split: 5,
            min_samples_leaf: 2,
            subsample: 0.8,
            huber_alpha: 0.9,
            seed: 42,
        }
    }
}

impl GradientBoostingParams {
    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            bail!("n_estimators must be at least 1");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            bail!("learning_rate must be in (0, 1], got {}", self.learning_rate);
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            bail!("subsample must be in (0, 1], got {}", self.subsample);
        }
        if !(self.huber_alpha > 0.0 && self.huber_alpha < 1.0) {
            bail!("huber_alpha must be in (0, 1), got {}", self.huber_alpha);
        }
        Ok(())
    }

    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.max_depth)
            .with_min_samples_split(self.min_samples_split)
            .with_min_samples_leaf(self.min_samples_leaf)
    }
}

#[derive(Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    init: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl fmt::Debug for GradientBoostingRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientBoostingRegressor")
            .field("init", &self.init)
            .field("learning_rate", &self.learning_rate)
            .field("n_trees", &self.trees.len())
            .finish()
    }
}

impl GradientBoostingRegressor {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &GradientBoostingParams) -> Result<Self> {
        params.validate()?;
        if x.is_empty() {
            bail!("Cannot fit on an empty dataset");
        }
        if x.len() != y.len() {
            bail!("Feature rows ({}) and targets ({}) differ", x.len(), y.len());
        }

        let n = x.len();
        let init = percentile(y, 0.5);
        let mut current = vec![init; n];
        let full = to_matrix(x)?;
        let tree_params = params.tree_parameters();
        let n_sub = ((n as f64 * params.subsample).round() as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut rows: Vec<usize> = (0..n).collect();
        let mut trees = Vec::with_capacity(params.n_estimators);

        for stage in 0..params.n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&current).map(|(t, p)| t - p).collect();
            let pseudo = huber_pseudo_residuals(&residuals, params.huber_alpha);

            let fitted = if n_sub < n {
                rows.shuffle(&mut rng);
                let x_sub: Vec<Vec<f64>> = rows[..n_sub].iter().map(|&i| x[i].clone()).collect();
                let y_sub: Vec<f64> = rows[..n_sub].iter().map(|&i| pseudo[i]).collect();
                Tree::fit(&to_matrix(&x_sub)?, &y_sub, tree_params.clone())
            } else {
                Tree::fit(&full, &pseudo, tree_params.clone())
            };
            let tree =
                fitted.map_err(|e| anyhow!("Training error at stage {}: {}", stage, e))?;

            let update = tree
                .predict(&full)
                .map_err(|e| anyhow!("Predict error at stage {}: {}", stage, e))?;
            for (c, u) in current.iter_mut().zip(update) {
                *c += params.learning_rate * u;
            }
            trees.push(tree);

            if (stage + 1) % 100 == 0 {
                debug!("Boosting stage {}/{}", stage + 1, params.n_estimators);
            }
        }

        Ok(Self {
            init,
            learning_rate: params.learning_rate,
            trees,
        })
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let mut out = vec![self.init; x.len()];
        if x.is_empty() {
            return Ok(out);
        }
        let matrix = to_matrix(x)?;
        for tree in &self.trees {
            let update = tree
                .predict(&matrix)
                .map_err(|e| anyhow!("Predict error: {}", e))?;
            for (o, u) in out.iter_mut().zip(update) {
                *o += self.learning_rate * u;
            }
        }
        Ok(out)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| anyhow!("Matrix error: {}", e))
}

/// Negative gradient of the Huber loss: the residual itself inside the
/// `alpha` quantile of absolute residuals, its clipped sign outside.
fn huber_pseudo_residuals(residuals: &[f64], alpha: f64) -> Vec<f64> {
    let abs: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
    let delta = percentile(&abs, alpha);
    residuals
        .iter()
        .map(|&r| if r.abs() <= delta { r } else { delta * r.signum() })
        .collect()
}

/// Linear-interpolated quantile, `q` in [0, 1].
fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..60).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| 2.0 * r[0] + 5.0).collect();
        (x, y)
    }

    fn small_params() -> GradientBoostingParams {
        GradientBoostingParams {
            n_estimators: 60,
            learning_rate: 0.2,
            max_depth: 4,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_percentile_interpolates() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5);
        assert_eq!(percentile(&[5.0, 1.0, 3.0], 0.5), 3.0);
        assert_eq!(percentile(&[0.0, 10.0], 0.9), 9.0);
    }

    #[test]
    fn test_huber_clips_large_residuals() {
        let residuals = vec![1.0, -1.0, 2.0, -2.0, 100.0];
        let pseudo = huber_pseudo_residuals(&residuals, 0.5);
        // delta is the median absolute residual (2.0)
        assert_eq!(pseudo, vec![1.0, -1.0, 2.0, -2.0, 2.0]);
    }

    #[test]
    fn test_fit_reduces_error() {
        let (x, y) = linear_data();
        let model = GradientBoostingRegressor::fit(&x, &y, &small_params()).unwrap();
        assert_eq!(model.n_trees(), 60);

        let pred = model.predict(&x).unwrap();
        let baseline: f64 = y.iter().map(|t| (t - percentile(&y, 0.5)).abs()).sum::<f64>();
        let fitted: f64 = pred.iter().zip(&y).map(|(p, t)| (p - t).abs()).sum::<f64>();
        assert!(fitted < baseline * 0.2, "fitted={} baseline={}", fitted, baseline);
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let (x, y) = linear_data();
        let a = GradientBoostingRegressor::fit(&x, &y, &small_params()).unwrap();
        let b = GradientBoostingRegressor::fit(&x, &y, &small_params()).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_rejects_bad_params() {
        let (x, y) = linear_data();
        let params = GradientBoostingParams {
            subsample: 0.0,
            ..small_params()
        };
        assert!(GradientBoostingRegressor::fit(&x, &y, &params).is_err());
        assert!(GradientBoostingRegressor::fit(&[], &[], &small_params()).is_err());
    }

    #[test]
    fn test_serde_roundtrip_preserves_predictions() {
        let (x, y) = linear_data();
        let model = GradientBoostingRegressor::fit(&x, &y, &small_params()).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: GradientBoostingRegressor = serde_json::from_str(&json).unwrap();
        for (a, b) in model
            .predict(&x)
            .unwrap()
            .iter()
            .zip(restored.predict(&x).unwrap())
        {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
