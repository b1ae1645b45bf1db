use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five behavioral inputs a Performance Index is predicted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StudentInputs {
    pub hours_studied: u32,
    pub previous_scores: u32,
    pub extracurricular: bool,
    pub sleep_hours: u32,
    pub sample_papers: u32,
}

impl StudentInputs {
    pub fn new(
        hours_studied: u32,
        previous_scores: u32,
        extracurricular: bool,
        sleep_hours: u32,
        sample_papers: u32,
    ) -> Self {
        Self {
            hours_studied,
            previous_scores,
            extracurricular,
            sleep_hours,
            sample_papers,
        }
    }

    /// Hours studied plus hours slept, used by the daily-hours rule.
    pub fn daily_hours(&self) -> u32 {
        self.hours_studied + self.sleep_hours
    }
}

/// Inputs paired with an observed Performance Index.
///
/// Used both as the create/update payload for stored records and as a
/// labeled training row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    #[serde(flatten)]
    pub inputs: StudentInputs,
    pub performance_index: f64,
}

impl PerformanceSample {
    pub fn new(inputs: StudentInputs, performance_index: f64) -> Self {
        Self {
            inputs,
            performance_index,
        }
    }
}

/// A persisted performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: i64,
    #[serde(flatten)]
    pub inputs: StudentInputs,
    pub performance_index: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for PerformanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Performance Index: {}", self.performance_index)
    }
}
