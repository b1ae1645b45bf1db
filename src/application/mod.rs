// Model training, evaluation and inference
pub mod ml;
