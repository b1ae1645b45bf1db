//! perfindex Server - Performance Index prediction and record API
//!
//! Serves the REST API over the SQLite record store and the trained model.
//! Metrics are pushed via structured JSON logs to stdout.
//!
//! # Usage
//! ```sh
//! PORT=8000 MODEL_DIR=data/model cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `BIND_ADDRESS` - Interface to listen on (default: 127.0.0.1)
//! - `PORT` - Port to listen on (default: 8000)
//! - `DATABASE_URL` - SQLite database (default: sqlite://data/student_performance.db)
//! - `MODEL_DIR` - Directory with model.json, scaler.json, features.json (default: data/model)
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::{Context, Result};
use perfindex::application::ml::{PerformancePredictor, SmartCorePredictor};
use perfindex::config::Config;
use perfindex::domain::errors::ArtifactError;
use perfindex::domain::repositories::PerformanceRecordRepository;
use perfindex::infrastructure::ArtifactPaths;
use perfindex::infrastructure::observability::{Metrics, MetricsReporter};
use perfindex::infrastructure::persistence::{Database, SqlitePerformanceRecordRepository};
use perfindex::interfaces::api::{AppState, build_router};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn load_predictor(paths: &ArtifactPaths) -> Option<Arc<dyn PerformancePredictor>> {
    match paths.load().and_then(SmartCorePredictor::new) {
        Ok(predictor) => Some(Arc::new(predictor)),
        Err(ArtifactError::Missing { path }) => {
            warn!(
                "Model artifact not found at {}. Predictions will fail until the model is trained.",
                path.display()
            );
            None
        }
        Err(e) => {
            warn!("Failed to load model artifacts: {}", e);
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
    }
    info!("Shutdown signal received. Exiting...");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(stdout_layer)
        .init();

    info!("perfindex Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;
    info!(
        "Configuration loaded: Database={}, ModelDir={}",
        config.database_url,
        config.model_dir.display()
    );

    let database = Database::new(&config.database_url).await?;
    let repository: Arc<dyn PerformanceRecordRepository> =
        Arc::new(SqlitePerformanceRecordRepository::new(database.pool.clone()));

    let predictor = load_predictor(&ArtifactPaths::in_dir(&config.model_dir));
    match &predictor {
        Some(p) => info!("Model loaded: {} ({})", p.name(), p.version()),
        None => warn!("Model not loaded. POST /api/predict/ will return 500."),
    }

    let metrics = Metrics::new()?;

    if config.observability_enabled {
        let reporter = MetricsReporter::new(
            repository.clone(),
            metrics.clone(),
            predictor.is_some(),
            config.observability_interval_secs,
        );

        tokio::spawn(async move {
            reporter.run().await;
        });

        info!(
            "Metrics reporter started (interval: {}s)",
            config.observability_interval_secs
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let router = build_router(Arc::new(AppState {
        repository,
        predictor,
        metrics,
    }));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}. Press Ctrl+C to shutdown.", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    database.pool.close().await;
    Ok(())
}
