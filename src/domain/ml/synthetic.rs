//! Synthetic edge-case rows appended to the training set.
//!
//! The base dataset only covers moderate study and sleep habits. Each family
//! below fills a region the regressor would otherwise extrapolate into:
//! sleep deprivation, oversleeping, not studying, exhaustion from studying
//! most of the day, a dense grid of realistic days and diminishing returns
//! for long study sessions.

use crate::domain::records::{PerformanceSample, StudentInputs};
use std::fmt;

const STUDY_GRID: [u32; 5] = [0, 6, 12, 18, 24];
const PAPER_GRID: [u32; 4] = [0, 3, 6, 9];
const LOW_SCORE_GRID: [u32; 4] = [20, 40, 60, 80];
const BOOLS: [bool; 2] = [true, false];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeCaseFamily {
    SleepDeprivation,
    Oversleep,
    NoStudy,
    Exhaustion,
    Realistic,
    DiminishingReturns,
}

impl EdgeCaseFamily {
    pub const ALL: [EdgeCaseFamily; 6] = [
        EdgeCaseFamily::SleepDeprivation,
        EdgeCaseFamily::Oversleep,
        EdgeCaseFamily::NoStudy,
        EdgeCaseFamily::Exhaustion,
        EdgeCaseFamily::Realistic,
        EdgeCaseFamily::DiminishingReturns,
    ];

    pub fn samples(self) -> Vec<PerformanceSample> {
        match self {
            EdgeCaseFamily::SleepDeprivation => sleep_deprivation(),
            EdgeCaseFamily::Oversleep => oversleep(),
            EdgeCaseFamily::NoStudy => no_study(),
            EdgeCaseFamily::Exhaustion => exhaustion(),
            EdgeCaseFamily::Realistic => realistic(),
            EdgeCaseFamily::DiminishingReturns => diminishing_returns(),
        }
    }
}

impl fmt::Display for EdgeCaseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeCaseFamily::SleepDeprivation => "Sleep Deprivation",
            EdgeCaseFamily::Oversleep => "Oversleep",
            EdgeCaseFamily::NoStudy => "No Study",
            EdgeCaseFamily::Exhaustion => "Exhaustion",
            EdgeCaseFamily::Realistic => "Realistic",
            EdgeCaseFamily::DiminishingReturns => "Diminishing Returns",
        };
        write!(f, "{}", name)
    }
}

/// All synthetic families, in order.
pub fn generate_edge_cases() -> Vec<PerformanceSample> {
    EdgeCaseFamily::ALL
        .iter()
        .flat_map(|family| family.samples())
        .collect()
}

/// Returns `base` followed by every synthetic edge case.
pub fn augment(base: &[PerformanceSample]) -> Vec<PerformanceSample> {
    let mut combined = base.to_vec();
    combined.extend(generate_edge_cases());
    combined
}

fn bonus(extra: bool, amount: f64) -> f64 {
    if extra { amount } else { 0.0 }
}

fn sample(
    studied: u32,
    prev: u32,
    extra: bool,
    sleep: u32,
    papers: u32,
    index: f64,
) -> PerformanceSample {
    PerformanceSample::new(StudentInputs::new(studied, prev, extra, sleep, papers), index)
}

fn sleep_deprivation() -> Vec<PerformanceSample> {
    let mut out = Vec::new();
    for sleep in [0, 1, 2] {
        for studied in STUDY_GRID {
            for papers in PAPER_GRID {
                for extra in BOOLS {
                    for prev in LOW_SCORE_GRID {
                        let raw = studied as f64 * 2.5
                            + prev as f64 * 0.4
                            + papers as f64 * 1.5
                            + bonus(extra, 2.0)
                            - (24 - sleep) as f64 * 3.0;
                        out.push(sample(studied, prev, extra, sleep, papers, raw.max(10.0)));
                    }
                }
            }
        }
    }
    out
}

fn oversleep() -> Vec<PerformanceSample> {
    let mut out = Vec::new();
    for sleep in [23, 24] {
        for studied in STUDY_GRID {
            for papers in PAPER_GRID {
                for extra in BOOLS {
                    for prev in LOW_SCORE_GRID {
                        let base = studied as f64 * 3.0
                            + prev as f64 * 0.5
                            + papers as f64 * 2.0
                            + bonus(extra, 3.0);
                        let penalty = ((sleep as f64 - 9.0) * 1.5).max(0.0);
                        let index = (base - penalty).max(15.0);
                        out.push(sample(studied, prev, extra, sleep, papers, index));
                    }
                }
            }
        }
    }
    out
}

fn no_study() -> Vec<PerformanceSample> {
    let mut out = Vec::new();
    for sleep in (0..=24).step_by(3) {
        for papers in PAPER_GRID {
            for extra in BOOLS {
                for prev in [30, 50, 70] {
                    let index = prev as f64 * 0.3
                        + papers as f64 * 0.5
                        + bonus(extra, 1.0)
                        + ((sleep as f64 - 8.0) * 0.5).max(0.0);
                    out.push(sample(0, prev, extra, sleep, papers, index));
                }
            }
        }
    }
    out
}

fn exhaustion() -> Vec<PerformanceSample> {
    let mut out = Vec::new();
    for sleep in (0..10).step_by(2) {
        let max_study: u32 = 24 - sleep;
        for studied in [max_study.saturating_sub(2), max_study] {
            for papers in (0..=10).step_by(2) {
                for extra in BOOLS {
                    for prev in [30, 60, 90] {
                        let penalty = ((24 - sleep) as f64 * 2.0).max(0.0);
                        let index = (prev as f64 * 0.6
                            + papers as f64 * 3.0
                            + bonus(extra, 2.0)
                            + 20.0
                            - penalty)
                            .min(100.0);
                        out.push(sample(studied, prev, extra, sleep, papers, index));
                    }
                }
            }
        }
    }
    out
}

fn realistic() -> Vec<PerformanceSample> {
    let mut out = Vec::new();
    for hours in 1..=24u32 {
        for sleep in 5..=9u32 {
            if hours + sleep > 24 {
                continue;
            }
            for papers in 1..=10u32 {
                for prev in [50, 75, 95] {
                    for extra in BOOLS {
                        let base = hours as f64 * 2.5
                            + prev as f64 * 0.6
                            + papers as f64 * 1.5
                            + bonus(extra, 3.0);
                        let sleep_effect = if (7..=9).contains(&sleep) {
                            0.0
                        } else {
                            (sleep as f64 - 8.0).abs() * 1.5
                        };
                        let index = (base - sleep_effect).clamp(10.0, 100.0);
                        out.push(sample(hours, prev, extra, sleep, papers, index));
                    }
                }
            }
        }
    }
    out
}

fn diminishing_returns() -> Vec<PerformanceSample> {
    let mut out = Vec::new();
    for hours in 12..=24u32 {
        for sleep in 6..=9u32 {
            if hours + sleep > 24 {
                continue;
            }
            for papers in 5..=10u32 {
                for prev in [40, 70, 95] {
                    for extra in BOOLS {
                        let base = hours as f64 * 2.0
                            + prev as f64 * 0.7
                            + papers as f64 * 2.0
                            + bonus(extra, 3.0);
                        let diminishing = ((hours as f64 - 12.0) * 0.3).max(0.0);
                        let index = (base - diminishing).clamp(20.0, 100.0);
                        out.push(sample(hours, prev, extra, sleep, papers, index));
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_sizes() {
        let sizes: Vec<usize> = EdgeCaseFamily::ALL
            .iter()
            .map(|f| f.samples().len())
            .collect();
        assert_eq!(sizes, vec![480, 320, 216, 360, 5100, 792]);
        assert_eq!(generate_edge_cases().len(), 7268);
    }

    #[test]
    fn test_sleep_deprivation_floor() {
        let rows = EdgeCaseFamily::SleepDeprivation.samples();
        assert!(rows.iter().all(|s| s.performance_index >= 10.0));
        assert!(rows.iter().all(|s| s.inputs.sleep_hours <= 2));

        // 24h study, 80 prev, 9 papers, extracurricular, 2h sleep
        let best = rows
            .iter()
            .find(|s| s.inputs == StudentInputs::new(24, 80, true, 2, 9))
            .unwrap();
        assert_eq!(best.performance_index, 60.0 + 32.0 + 13.5 + 2.0 - 66.0);
    }

    #[test]
    fn test_oversleep_floor() {
        let rows = EdgeCaseFamily::Oversleep.samples();
        assert!(rows.iter().all(|s| s.performance_index >= 15.0));
        let idle = rows
            .iter()
            .find(|s| s.inputs == StudentInputs::new(0, 20, false, 24, 0))
            .unwrap();
        assert_eq!(idle.performance_index, 15.0);
    }

    #[test]
    fn test_no_study_rows() {
        let rows = EdgeCaseFamily::NoStudy.samples();
        assert!(rows.iter().all(|s| s.inputs.hours_studied == 0));
        let rested = rows
            .iter()
            .find(|s| s.inputs == StudentInputs::new(0, 70, true, 24, 9))
            .unwrap();
        assert_eq!(rested.performance_index, 21.0 + 4.5 + 1.0 + 8.0);
    }

    #[test]
    fn test_exhaustion_fills_the_day() {
        let rows = EdgeCaseFamily::Exhaustion.samples();
        assert!(rows.iter().all(|s| s.inputs.daily_hours() == 24 || s.inputs.daily_hours() == 22));
        assert!(rows.iter().all(|s| s.performance_index <= 100.0));
    }

    #[test]
    fn test_bounded_families_respect_day_length_and_clip() {
        for row in EdgeCaseFamily::Realistic.samples() {
            assert!(row.inputs.daily_hours() <= 24);
            assert!((10.0..=100.0).contains(&row.performance_index));
        }
        for row in EdgeCaseFamily::DiminishingReturns.samples() {
            assert!(row.inputs.daily_hours() <= 24);
            assert!((20.0..=100.0).contains(&row.performance_index));
        }
    }

    #[test]
    fn test_augment_keeps_base_first() {
        let base = vec![PerformanceSample::new(StudentInputs::new(7, 99, true, 9, 1), 91.0)];
        let combined = augment(&base);
        assert_eq!(combined.len(), 7269);
        assert_eq!(combined[0], base[0]);
    }
}
