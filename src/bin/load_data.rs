//! Imports the dataset CSV into the record database.
//!
//! Rows whose hours studied, previous scores and performance index already
//! exist are skipped, so the import can be re-run safely.

use anyhow::{Context, Result};
use clap::Parser;
use perfindex::config::Config;
use perfindex::domain::errors::DatasetError;
use perfindex::infrastructure::dataset::{import_samples, read_dataset};
use perfindex::infrastructure::persistence::{Database, SqlitePerformanceRecordRepository};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the dataset CSV
    #[arg(long, default_value = "dataset.csv")]
    input: PathBuf,

    /// SQLite database URL (defaults to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let database_url = match args.database_url {
        Some(url) => url,
        None => Config::from_env()?.database_url,
    };

    let samples = match read_dataset(&args.input) {
        Ok(rows) => rows,
        Err(DatasetError::NotFound { path }) => {
            println!(
                "Error: {} not found. Make sure it's in the project root directory.",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read dataset"),
    };

    info!("Importing {} rows into {}", samples.len(), database_url);
    let database = Database::new(&database_url).await?;
    let repository = SqlitePerformanceRecordRepository::new(database.pool.clone());

    let inserted = import_samples(&repository, &samples).await?;

    println!("Successfully loaded {} new records into the database.", inserted);
    database.pool.close().await;
    Ok(())
}
