//! CSV reader for the student performance dataset.
//!
//! Expected header:
//! `Hours Studied,Previous Scores,Extracurricular Activities,Sleep Hours,Sample Question Papers Practiced,Performance Index`

use crate::domain::errors::DatasetError;
use crate::domain::records::{PerformanceSample, StudentInputs};
use crate::domain::repositories::PerformanceRecordRepository;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Hours Studied")]
    hours_studied: u32,
    #[serde(rename = "Previous Scores")]
    previous_scores: u32,
    #[serde(rename = "Extracurricular Activities")]
    extracurricular: String,
    #[serde(rename = "Sleep Hours")]
    sleep_hours: u32,
    #[serde(rename = "Sample Question Papers Practiced")]
    sample_papers: u32,
    #[serde(rename = "Performance Index")]
    performance_index: f64,
}

impl DatasetRow {
    fn into_sample(self, row: usize) -> Result<PerformanceSample, DatasetError> {
        let extracurricular = match self.extracurricular.trim().to_lowercase().as_str() {
            "yes" => true,
            "no" => false,
            other => {
                return Err(DatasetError::MalformedRow {
                    row,
                    reason: format!(
                        "Extracurricular Activities must be Yes or No, got '{}'",
                        other
                    ),
                });
            }
        };

        Ok(PerformanceSample::new(
            StudentInputs::new(
                self.hours_studied,
                self.previous_scores,
                extracurricular,
                self.sleep_hours,
                self.sample_papers,
            ),
            self.performance_index,
        ))
    }
}

/// Parses dataset rows from any CSV source. Row numbers in errors are
/// 1-based and exclude the header.
pub fn parse_dataset<R: Read>(source: R) -> Result<Vec<PerformanceSample>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    reader
        .deserialize::<DatasetRow>()
        .enumerate()
        .map(|(i, row)| row?.into_sample(i + 1))
        .collect()
}

pub fn read_dataset(path: &Path) -> Result<Vec<PerformanceSample>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(csv::Error::from)?;
    let samples = parse_dataset(BufReader::new(file))?;
    info!("Loaded {} rows from {}", samples.len(), path.display());
    Ok(samples)
}

/// Inserts every sample without a similar stored record and returns how
/// many were inserted. Re-running over the same rows inserts nothing.
pub async fn import_samples(
    repository: &dyn PerformanceRecordRepository,
    samples: &[PerformanceSample],
) -> anyhow::Result<usize> {
    let mut inserted = 0usize;
    for sample in samples {
        if repository.exists_similar(sample).await? {
            continue;
        }
        repository.create(sample).await?;
        inserted += 1;
    }
    info!(
        "Import finished: {} rows read, {} inserted",
        samples.len(),
        inserted
    );
    Ok(inserted)
}
