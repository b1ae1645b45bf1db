use crate::domain::errors::PredictionError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Per-feature standardization: `(x - mean) / scale`.
///
/// `scale` is the population standard deviation of the column, or 1 for a
/// constant column so the transform stays finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fits column statistics over `rows`. An empty input yields an empty
    /// scaler.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        let mut mean = Vec::with_capacity(n_features);
        let mut scale = Vec::with_capacity(n_features);

        for col in 0..n_features {
            let column: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            mean.push(column.iter().mean());
            let std = column.iter().population_std_dev();
            scale.push(if std.is_finite() && std > 0.0 { std } else { 1.0 });
        }

        Self { mean, scale }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if row.len() != self.n_features() {
            return Err(PredictionError::FeatureCountMismatch {
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, PredictionError> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}
