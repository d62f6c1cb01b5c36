//! Configuration management for the SeaTrack server.
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;

use seatrack_common::Origin;

use crate::session::DEFAULT_ADMIN_PASSWORD;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Origin issued tracking links point at. When unset, the origin is
    /// resolved per request from the Host header.
    pub public_origin: Option<Origin>,

    /// Shared admin secret for the QR issuance pages.
    pub admin_password: String,

    /// Record store connection URL.
    pub redis_url: String,

    /// Whether to use the in-memory record store (for development/testing).
    pub mock_mode: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let public_origin = match env::var("SEATRACK_PUBLIC_ORIGIN") {
            Ok(raw) => Some(Origin::parse(&raw).context("Invalid SEATRACK_PUBLIC_ORIGIN")?),
            Err(_) => None,
        };

        let config = Config {
            host: env::var("SEATRACK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("SEATRACK_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SEATRACK_PORT")?,

            public_origin,

            admin_password: env::var("SEATRACK_ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),

            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),

            mock_mode: env::var("MOCK_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("Invalid MOCK_MODE (expected true/false)")?,
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("SEATRACK_PORT must be greater than 0");
        }

        if self.admin_password.is_empty() {
            anyhow::bail!("SEATRACK_ADMIN_PASSWORD must not be empty");
        }

        Ok(())
    }

    /// The address the server listens on.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
