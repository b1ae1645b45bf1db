//! Fixed scenarios for sanity-checking a trained model at the extremes of the
//! input space.

use super::predictor::PerformancePredictor;
use crate::domain::errors::PredictionError;
use crate::domain::records::StudentInputs;
use serde::Serialize;

/// Predictions inside this band are considered reasonable
pub const REASONABLE_RANGE: (f64, f64) = (10.0, 90.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasScenario {
    pub name: &'static str,
    pub inputs: StudentInputs,
}

const fn scenario(
    name: &'static str,
    hours_studied: u32,
    previous_scores: u32,
    extracurricular: bool,
    sleep_hours: u32,
    sample_papers: u32,
) -> BiasScenario {
    BiasScenario {
        name,
        inputs: StudentInputs {
            hours_studied,
            previous_scores,
            extracurricular,
            sleep_hours,
            sample_papers,
        },
    }
}

pub const SCENARIOS: [BiasScenario; 10] = [
    scenario("Zero Sleep", 8, 75, true, 0, 5),
    scenario("24h Sleep", 0, 70, false, 24, 2),
    scenario("No Study", 0, 60, true, 8, 3),
    scenario("16h Study", 16, 80, true, 8, 10),
    scenario("Complete Zero Effort", 0, 40, false, 0, 0),
    scenario("Perfect Scenario", 8, 95, true, 8, 8),
    scenario("Maximum Realistic", 12, 90, true, 12, 10),
    scenario("Sleep Deprivation", 20, 70, false, 1, 9),
    scenario("Low Effort", 1, 30, false, 6, 0),
    scenario("Average Case", 5, 70, true, 7, 3),
];

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    #[serde(flatten)]
    pub inputs: StudentInputs,
    pub prediction: f64,
    pub reasonable: bool,
}

pub fn is_reasonable(prediction: f64) -> bool {
    let (lo, hi) = REASONABLE_RANGE;
    (lo..=hi).contains(&prediction)
}

/// Predicts every scenario in one batch.
pub fn evaluate(
    predictor: &dyn PerformancePredictor,
) -> Result<Vec<ScenarioOutcome>, PredictionError> {
    let inputs: Vec<StudentInputs> = SCENARIOS.iter().map(|s| s.inputs).collect();
    let predictions = predictor.predict_batch(&inputs)?;

    Ok(SCENARIOS
        .iter()
        .zip(predictions)
        .map(|(s, prediction)| ScenarioOutcome {
            name: s.name,
            inputs: s.inputs,
            prediction,
            reasonable: is_reasonable(prediction),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::clamp_prediction;

    /// Scores a scenario by its previous score minus 25.
    struct PreviousScore;

    impl PerformancePredictor for PreviousScore {
        fn predict(&self, inputs: &StudentInputs) -> Result<f64, PredictionError> {
            clamp_prediction(inputs.previous_scores as f64 - 25.0)
        }
        fn name(&self) -> &str {
            "previous-score"
        }
        fn version(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_scenarios_are_unique_and_in_range() {
        let mut names: Vec<&str> = SCENARIOS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
        assert!(SCENARIOS.iter().all(|s| s.inputs.hours_studied <= 24
            && s.inputs.sleep_hours <= 24
            && s.inputs.previous_scores <= 100
            && s.inputs.sample_papers <= 50));
    }

    #[test]
    fn test_reasonable_band_is_inclusive() {
        assert!(is_reasonable(10.0));
        assert!(is_reasonable(90.0));
        assert!(!is_reasonable(9.99));
        assert!(!is_reasonable(90.01));
    }

    #[test]
    fn test_evaluate_flags_extremes() {
        let outcomes = evaluate(&PreviousScore).unwrap();
        assert_eq!(outcomes.len(), 10);

        let flagged: Vec<&str> = outcomes
            .iter()
            .filter(|o| !o.reasonable)
            .map(|o| o.name)
            .collect();
        // 40 - 25 = 15 is fine, 30 - 25 = 5 is not
        assert_eq!(flagged, vec!["Low Effort"]);
        assert_eq!(outcomes[5].prediction, 70.0);
    }
}
