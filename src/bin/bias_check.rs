//! Predicts the fixed bias scenarios with the trained model and flags
//! predictions outside the reasonable band.

use anyhow::Result;
use clap::Parser;
use perfindex::application::ml::SmartCorePredictor;
use perfindex::application::ml::bias_scenarios::{self, REASONABLE_RANGE};
use perfindex::domain::errors::ArtifactError;
use perfindex::infrastructure::ArtifactPaths;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory with model.json, scaler.json and features.json
    #[arg(long, env = "MODEL_DIR", default_value = "data/model")]
    model_dir: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let artifacts = match ArtifactPaths::in_dir(&args.model_dir).load() {
        Ok(artifacts) => artifacts,
        Err(ArtifactError::Missing { path }) => {
            println!("Error: {} not found", path.display());
            println!("Make sure the model has been trained first!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let predictor = SmartCorePredictor::new(artifacts)?;
    let outcomes = bias_scenarios::evaluate(&predictor)?;

    println!("{}", "=".repeat(80));
    println!("BIAS TEST SCENARIOS - MODEL PREDICTIONS");
    println!("{}", "=".repeat(80));

    for (i, outcome) in outcomes.iter().enumerate() {
        let inputs = &outcome.inputs;
        println!("\nScenario {}: {}", i + 1, outcome.name);
        println!(
            "  Hours Studied: {:2} | Sleep: {:2} | Previous Score: {:3} | Papers: {:2} | Extracurricular: {}",
            inputs.hours_studied,
            inputs.sleep_hours,
            inputs.previous_scores,
            inputs.sample_papers,
            inputs.extracurricular
        );
        println!("  → Predicted Performance: {:.2}/100", outcome.prediction);
    }

    println!("\n{}", "=".repeat(80));
    println!(
        "SANITY CHECKS (reasonable = {:.0}..{:.0}):",
        REASONABLE_RANGE.0, REASONABLE_RANGE.1
    );
    println!("{}", "=".repeat(80));
    for outcome in &outcomes {
        let status = if outcome.reasonable {
            "✓ REASONABLE"
        } else {
            "⚠ EXTREME"
        };
        println!(
            "{:40}: {:6.2}/100 {}",
            outcome.name, outcome.prediction, status
        );
    }
    println!("{}", "=".repeat(80));

    let extreme = outcomes.iter().filter(|o| !o.reasonable).count();
    println!("{} of {} scenarios reasonable", outcomes.len() - extreme, outcomes.len());
    Ok(())
}
