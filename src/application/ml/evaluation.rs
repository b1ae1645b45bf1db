use super::regressor::RegressorModel;
use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub n: usize,
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute(predictions: &[f64], actuals: &[f64]) -> Self {
        let n = predictions.len().min(actuals.len());
        if n == 0 {
            return Self {
                n: 0,
                mse: 0.0,
                mae: 0.0,
                r2: 0.0,
            };
        }

        let pairs = predictions.iter().zip(actuals.iter());
        let mse = pairs.clone().map(|(p, t)| (p - t).powi(2)).sum::<f64>() / n as f64;
        let mae = pairs.map(|(p, t)| (p - t).abs()).sum::<f64>() / n as f64;

        Self {
            n,
            mse,
            mae,
            r2: r2_score(predictions, actuals),
        }
    }
}

/// Coefficient of determination. A constant target yields 0.
pub fn r2_score(predictions: &[f64], actuals: &[f64]) -> f64 {
    if actuals.is_empty() {
        return 0.0;
    }
    let mean_y = actuals.iter().mean();
    let ss_tot: f64 = actuals.iter().map(|t| (t - mean_y).powi(2)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum();

    if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidation {
    pub fold_r2: Vec<f64>,
    pub mean_r2: f64,
    /// Population standard deviation across folds
    pub std_r2: f64,
}

/// Shuffled k-fold partition of `0..n`. The first `n % k` folds hold one
/// extra row. Returns `(train, test)` index pairs.
pub fn k_fold_splits(n: usize, k: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let base = n / k;
    let extra = n % k;
    let mut splits = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let size = base + usize::from(fold < extra);
        let test: Vec<usize> = indices[start..start + size].to_vec();
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[start + size..].iter())
            .copied()
            .collect();
        splits.push((train, test));
        start += size;
    }
    splits
}

/// Runs `fit_predict(x_train, y_train, x_test)` on every fold in parallel
/// and scores each fold by R².
pub fn cross_validate<F>(
    x: &[Vec<f64>],
    y: &[f64],
    k: usize,
    seed: u64,
    fit_predict: F,
) -> Result<CrossValidation>
where
    F: Fn(&[Vec<f64>], &[f64], &[Vec<f64>]) -> Result<Vec<f64>> + Sync,
{
    if k < 2 {
        bail!("Cross-validation needs at least 2 folds, got {}", k);
    }
    if x.len() < k {
        bail!("Cannot split {} rows into {} folds", x.len(), k);
    }

    let fold_r2 = k_fold_splits(x.len(), k, seed)
        .par_iter()
        .map(|(train, test)| {
            let x_train: Vec<Vec<f64>> = train.iter().map(|&i| x[i].clone()).collect();
            let y_train: Vec<f64> = train.iter().map(|&i| y[i]).collect();
            let x_test: Vec<Vec<f64>> = test.iter().map(|&i| x[i].clone()).collect();
            let y_test: Vec<f64> = test.iter().map(|&i| y[i]).collect();

            let pred = fit_predict(&x_train, &y_train, &x_test)?;
            Ok(r2_score(&pred, &y_test))
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(CrossValidation {
        mean_r2: fold_r2.iter().mean(),
        std_r2: fold_r2.iter().population_std_dev(),
        fold_r2,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// Increase in MSE when the feature column is shuffled
    pub importance: f64,
}

/// Permutation importance of every column, most important first.
pub fn permutation_importance(
    model: &RegressorModel,
    x: &[Vec<f64>],
    y: &[f64],
    feature_names: &[String],
    seed: u64,
) -> Result<Vec<FeatureImportance>> {
    if x.is_empty() {
        return Ok(Vec::new());
    }

    let baseline = RegressionMetrics::compute(&model.predict(x)?, y).mse;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut importances = Vec::with_capacity(feature_names.len());

    for (col, name) in feature_names.iter().enumerate() {
        let mut column: Vec<f64> = x.iter().map(|row| row[col]).collect();
        column.shuffle(&mut rng);

        let permuted: Vec<Vec<f64>> = x
            .iter()
            .zip(column)
            .map(|(row, value)| {
                let mut row = row.clone();
                row[col] = value;
                row
            })
            .collect();

        let mse = RegressionMetrics::compute(&model.predict(&permuted)?, y).mse;
        importances.push(FeatureImportance {
            feature: name.clone(),
            importance: mse - baseline,
        });
    }

    importances.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    Ok(importances)
}
