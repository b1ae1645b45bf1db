//! Offline trainer for the Performance Index model.
//!
//! Reads the dataset CSV, appends synthetic edge cases, fits the configured
//! regressor and writes `model.json`, `scaler.json` and `features.json`.
//!
//! # Usage
//! ```sh
//! cargo run --release --bin train_model -- --input dataset.csv --output-dir data/model
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use perfindex::application::ml::Algorithm;
use perfindex::application::ml::trainer::{self, TrainingReport};
use perfindex::config::TrainingConfig;
use perfindex::domain::errors::DatasetError;
use perfindex::infrastructure::ArtifactPaths;
use perfindex::infrastructure::dataset::read_dataset;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the dataset CSV
    #[arg(long, default_value = "dataset.csv")]
    input: PathBuf,

    /// Directory the model, scaler and feature list are written to
    #[arg(long, default_value = "data/model")]
    output_dir: PathBuf,

    /// Optional TOML file with training hyperparameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Regression algorithm (overrides the config file)
    #[arg(long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Number of boosting stages (gradient-boosting) or trees (random-forest)
    #[arg(long)]
    n_estimators: Option<usize>,

    /// Maximum depth of each tree
    #[arg(long)]
    max_depth: Option<u16>,

    /// Shrinkage applied to each boosting stage
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Fraction of rows held out for testing
    #[arg(long)]
    test_size: Option<f64>,

    /// Cross-validation folds (0 disables cross-validation)
    #[arg(long)]
    cv_folds: Option<usize>,

    /// Seed for the split, the folds and the row subsampling
    #[arg(long)]
    seed: Option<u64>,

    /// Train on the dataset alone, without synthetic edge cases
    #[arg(long)]
    no_synthetic: bool,
}

impl Args {
    fn training_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)?,
            None => TrainingConfig::default(),
        };

        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(n) = self.n_estimators {
            config.gradient_boosting.n_estimators = n;
            config.random_forest.n_trees = n;
        }
        if let Some(depth) = self.max_depth {
            config.gradient_boosting.max_depth = depth;
            config.random_forest.max_depth = depth;
        }
        if let Some(rate) = self.learning_rate {
            config.gradient_boosting.learning_rate = rate;
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(folds) = self.cv_folds {
            config.cv_folds = folds;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
            config.gradient_boosting.seed = seed;
        }
        if self.no_synthetic {
            config.synthetic = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn print_report(report: &TrainingReport) {
    println!("\n{}", "=".repeat(60));
    println!("MODEL PERFORMANCE METRICS ({})", report.algorithm);
    println!("{}", "=".repeat(60));
    println!(
        "Rows: {} base + {} synthetic | Train: {} | Test: {}",
        report.base_rows, report.synthetic_rows, report.train_rows, report.test_rows
    );
    println!("Train MSE: {:.4}", report.train.mse);
    println!("Test MSE: {:.4}", report.test.mse);
    println!("Train R² Score: {:.4}", report.train.r2);
    println!("Test R² Score: {:.4}", report.test.r2);
    println!("Train MAE: {:.4}", report.train.mae);
    println!("Test MAE: {:.4}", report.test.mae);
    if let Some(cv) = &report.cross_validation {
        println!("Cross-validation R² (mean): {:.4}", cv.mean_r2);
        println!("Cross-validation R² (std): {:.4}", cv.std_r2);
    }
    println!("{}", "=".repeat(60));

    println!("\nTop {} Feature Importances:", report.top_features.len());
    println!("  {:<28} {:>12}", "feature", "importance");
    for item in &report.top_features {
        println!("  {:<28} {:>12.4}", item.feature, item.importance);
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = args.training_config()?;

    println!("Loading dataset from {}", args.input.display());
    let base = match read_dataset(&args.input) {
        Ok(rows) => rows,
        Err(DatasetError::NotFound { path }) => {
            println!(
                "Error: {} not found. Make sure the dataset is in place before training.",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read dataset"),
    };
    println!("Base dataset rows: {}", base.len());

    let outcome = trainer::train(&base, &config)?;
    print_report(&outcome.report);

    let paths = ArtifactPaths::in_dir(&args.output_dir);
    paths.save(&outcome.artifacts)?;

    println!("\nModel saved at: {}", paths.model.display());
    println!("Scaler saved at: {}", paths.scaler.display());
    println!("Features saved at: {}", paths.features.display());
    Ok(())
}
