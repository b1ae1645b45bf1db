//! JSON persistence for the trained model, the scaler and the feature list.

use crate::application::ml::regressor::{ModelArtifacts, RegressorModel};
use crate::domain::errors::ArtifactError;
use crate::domain::ml::StandardScaler;
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURES_FILE: &str = "features.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub features: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            features: dir.join(FEATURES_FILE),
        }
    }

    fn all(&self) -> [&Path; 3] {
        [&self.model, &self.scaler, &self.features]
    }

    /// First artifact that does not exist on disk.
    pub fn missing(&self) -> Option<&Path> {
        self.all().into_iter().find(|p| !p.exists())
    }

    pub fn save(&self, artifacts: &ModelArtifacts) -> Result<()> {
        for path in self.all() {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        write_json(&self.model, &artifacts.model)?;
        write_json(&self.scaler, &artifacts.scaler)?;
        write_json(&self.features, &artifacts.feature_names)?;

        info!("Model saved at: {}", self.model.display());
        info!("Scaler saved at: {}", self.scaler.display());
        info!("Features saved at: {}", self.features.display());
        Ok(())
    }

    pub fn load(&self) -> Result<ModelArtifacts, ArtifactError> {
        if let Some(path) = self.missing() {
            return Err(ArtifactError::Missing {
                path: path.to_path_buf(),
            });
        }

        let model: RegressorModel = read_json(&self.model)?;
        let scaler: StandardScaler = read_json(&self.scaler)?;
        let feature_names: Vec<String> = read_json(&self.features)?;

        let artifacts = ModelArtifacts {
            model,
            scaler,
            feature_names,
        };
        artifacts.validate()?;
        Ok(artifacts)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::gradient_boosting::GradientBoostingParams;

    fn tiny_artifacts() -> ModelArtifacts {
        let x = vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![3.0, 5.0], vec![4.0, 3.0]];
        let params = GradientBoostingParams {
            n_estimators: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..Default::default()
        };
        ModelArtifacts {
            model: RegressorModel::fit_gradient_boosting(&x, &[10.0, 20.0, 30.0, 40.0], &params)
                .unwrap(),
            scaler: StandardScaler::fit(&x),
            feature_names: vec!["hours_studied".into(), "sleep_hours".into()],
        }
    }

    #[test]
    fn test_paths_in_dir() {
        let paths = ArtifactPaths::in_dir("data/model");
        assert_eq!(paths.model, PathBuf::from("data/model/model.json"));
        assert_eq!(paths.scaler, PathBuf::from("data/model/scaler.json"));
        assert_eq!(paths.features, PathBuf::from("data/model/features.json"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("model"));
        let artifacts = tiny_artifacts();

        paths.save(&artifacts).unwrap();
        assert!(paths.missing().is_none());

        let loaded = paths.load().unwrap();
        assert_eq!(loaded.feature_names, artifacts.feature_names);
        assert_eq!(loaded.scaler, artifacts.scaler);
        let probe = vec![vec![2.5, 2.5]];
        let (a, b) = (
            artifacts.model.predict(&probe).unwrap()[0],
            loaded.model.predict(&probe).unwrap()[0],
        );
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        paths.save(&tiny_artifacts()).unwrap();
        fs::remove_file(&paths.scaler).unwrap();

        match paths.load() {
            Err(ArtifactError::Missing { path }) => assert_eq!(path, paths.scaler),
            other => panic!("expected Missing, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        paths.save(&tiny_artifacts()).unwrap();
        fs::write(&paths.features, "not json").unwrap();

        assert!(matches!(paths.load(), Err(ArtifactError::Decode { .. })));
    }
}
