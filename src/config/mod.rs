//! Configuration module for perfindex.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server and Observability. Training hyperparameters live in
//! a separate TOML-backed `TrainingConfig`.

mod observability_config;
mod server_config;
mod training_config;

pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;
pub use training_config::TrainingConfig;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub database_url: String,
    pub model_dir: PathBuf,

    pub observability_enabled: bool,
    pub observability_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            bind_address: server.bind_address,
            port: server.port,
            database_url: server.database_url,
            model_dir: server.model_dir,

            observability_enabled: observability.enabled,
            observability_interval_secs: observability.interval_secs,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        server_config::parse_socket_addr(&self.bind_address, self.port)
    }
}
