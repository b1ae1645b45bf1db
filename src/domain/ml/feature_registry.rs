use crate::domain::errors::PredictionError;
use crate::domain::records::StudentInputs;

/// Ordered list of feature names.
/// Training persists this list next to the model; inference reorders its
/// engineered row to match whatever list the loaded model was trained with.
pub const FEATURE_NAMES: &[&str] = &[
    "hours_studied",
    "previous_scores",
    "extracurricular",
    "sleep_hours",
    "sample_papers",
    "study_sleep_interaction",
    "study_papers_interaction",
    "papers_score_interaction",
    "hours_squared",
    "sleep_squared",
    "papers_squared",
    "study_efficiency",
    "sleep_quality",
    "score_percentile",
    "total_effort",
];

pub const FEATURE_COUNT: usize = 15;

/// Sleep duration treated as ideal by the sleep quality feature.
pub const OPTIMAL_SLEEP_HOURS: f64 = 8.0;

/// Expands the raw inputs into the full engineered feature row, in
/// `FEATURE_NAMES` order.
pub fn engineer_features(inputs: &StudentInputs) -> [f64; FEATURE_COUNT] {
    let hours = inputs.hours_studied as f64;
    let scores = inputs.previous_scores as f64;
    let extra = if inputs.extracurricular { 1.0 } else { 0.0 };
    let sleep = inputs.sleep_hours as f64;
    let papers = inputs.sample_papers as f64;

    let study_efficiency = if sleep > 0.0 { hours / sleep } else { 0.0 };

    [
        hours,
        scores,
        extra,
        sleep,
        papers,
        hours * sleep,
        hours * papers,
        papers * scores,
        hours.powi(2),
        sleep.powi(2),
        papers.powi(2),
        study_efficiency,
        (sleep - OPTIMAL_SLEEP_HOURS).abs(),
        scores / 100.0,
        (hours / 24.0 + papers / 10.0 + extra) / 3.0,
    ]
}

/// Position of a feature in the engineered row.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// Picks features out of an engineered row in the order given by `names`.
pub fn select_features(
    row: &[f64; FEATURE_COUNT],
    names: &[String],
) -> Result<Vec<f64>, PredictionError> {
    names
        .iter()
        .map(|name| {
            feature_index(name)
                .map(|i| row[i])
                .ok_or_else(|| PredictionError::UnknownFeature { name: name.clone() })
        })
        .collect()
}

/// The registry order as owned names, as persisted in `features.json`.
pub fn default_feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_length() {
        let row = engineer_features(&StudentInputs::default());
        assert_eq!(row.len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_engineered_values() {
        let inputs = StudentInputs::new(6, 80, true, 4, 5);
        let row = engineer_features(&inputs);

        assert_eq!(row[feature_index("extracurricular").unwrap()], 1.0);
        assert_eq!(row[feature_index("study_sleep_interaction").unwrap()], 24.0);
        assert_eq!(row[feature_index("study_papers_interaction").unwrap()], 30.0);
        assert_eq!(row[feature_index("papers_score_interaction").unwrap()], 400.0);
        assert_eq!(row[feature_index("hours_squared").unwrap()], 36.0);
        assert_eq!(row[feature_index("study_efficiency").unwrap()], 1.5);
        assert_eq!(row[feature_index("sleep_quality").unwrap()], 4.0);
        assert_eq!(row[feature_index("score_percentile").unwrap()], 0.8);

        let effort = row[feature_index("total_effort").unwrap()];
        assert!((effort - (0.25 + 0.5 + 1.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sleep_efficiency_is_zero() {
        let row = engineer_features(&StudentInputs::new(8, 75, true, 0, 5));
        assert_eq!(row[feature_index("study_efficiency").unwrap()], 0.0);
        assert_eq!(row[feature_index("sleep_quality").unwrap()], 8.0);
    }

    #[test]
    fn test_select_reorders() {
        let row = engineer_features(&StudentInputs::new(3, 90, false, 7, 2));
        let names = vec!["sleep_hours".to_string(), "hours_studied".to_string()];
        assert_eq!(select_features(&row, &names).unwrap(), vec![7.0, 3.0]);
    }

    #[test]
    fn test_select_unknown_feature() {
        let row = engineer_features(&StudentInputs::default());
        let names = vec!["shoe_size".to_string()];
        assert!(matches!(
            select_features(&row, &names),
            Err(PredictionError::UnknownFeature { .. })
        ));
    }
}
