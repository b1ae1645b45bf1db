pub mod bias_scenarios;
pub mod evaluation;
pub mod gradient_boosting;
pub mod predictor;
pub mod regressor;
pub mod smartcore_predictor;
pub mod trainer;

pub use predictor::PerformancePredictor;
pub use regressor::{Algorithm, ModelArtifacts, RegressorModel};
pub use smartcore_predictor::SmartCorePredictor;
