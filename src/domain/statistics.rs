use crate::domain::records::PerformanceRecord;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Aggregates served by `GET /api/statistics/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordStatistics {
    pub total_records: usize,
    pub average_performance: f64,
    pub max_performance: f64,
    pub min_performance: f64,
    pub average_hours_studied: f64,
    pub average_sleep_hours: f64,
}

impl RecordStatistics {
    /// Returns `None` for an empty record set.
    pub fn from_records(records: &[PerformanceRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let indices: Vec<f64> = records.iter().map(|r| r.performance_index).collect();
        let max_performance = indices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_performance = indices.iter().copied().fold(f64::INFINITY, f64::min);

        Some(Self {
            total_records: records.len(),
            average_performance: round2(indices.iter().mean()),
            max_performance: round2(max_performance),
            min_performance: round2(min_performance),
            average_hours_studied: round2(
                records.iter().map(|r| r.inputs.hours_studied as f64).mean(),
            ),
            average_sleep_hours: round2(records.iter().map(|r| r.inputs.sleep_hours as f64).mean()),
        })
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::StudentInputs;
    use chrono::Utc;

    fn record(id: i64, hours: u32, sleep: u32, index: f64) -> PerformanceRecord {
        let now = Utc::now();
        PerformanceRecord {
            id,
            inputs: StudentInputs::new(hours, 70, true, sleep, 2),
            performance_index: index,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_records_have_no_statistics() {
        assert!(RecordStatistics::from_records(&[]).is_none());
    }

    #[test]
    fn test_statistics_over_fixture() {
        let records = vec![record(1, 5, 6, 65.0), record(2, 8, 8, 85.0)];
        let stats = RecordStatistics::from_records(&records).unwrap();

        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.average_performance, 75.0);
        assert_eq!(stats.max_performance, 85.0);
        assert_eq!(stats.min_performance, 65.0);
        assert_eq!(stats.average_hours_studied, 6.5);
        assert_eq!(stats.average_sleep_hours, 7.0);
    }

    #[test]
    fn test_statistics_are_rounded() {
        let records = vec![
            record(1, 1, 7, 10.0),
            record(2, 2, 7, 20.0),
            record(3, 2, 8, 20.0),
        ];
        let stats = RecordStatistics::from_records(&records).unwrap();
        assert_eq!(stats.average_performance, 16.67);
        assert_eq!(stats.average_hours_studied, 1.67);
        assert_eq!(stats.average_sleep_hours, 7.33);
    }
}
