//! HTTP server and storage configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
    pub database_url: String,
    /// Directory holding `model.json`, `scaler.json` and `features.json`
    pub model_dir: PathBuf,
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Failed to parse PORT: {}", raw))?,
            Err(_) => 8000,
        };

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/student_performance.db".to_string()),
            model_dir: PathBuf::from(
                env::var("MODEL_DIR").unwrap_or_else(|_| "data/model".to_string()),
            ),
        })
    }
}

pub(crate) fn parse_socket_addr(bind_address: &str, port: u16) -> Result<SocketAddr> {
    format!("{}:{}", bind_address, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind_address, port))
}
