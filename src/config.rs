use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the encrypted snapshot file on disk.
    pub db_path: String,
    /// Port the HTTP API listens on.
    pub api_port: u16,
    /// Raw secret used to derive the snapshot's AES key. Never logged.
    pub secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            db_path: env::var("DB_PATH")
                .unwrap_or_else(|_| "/jobengine/database.queuedb".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "80".to_string())
                .parse()
                .context("API_PORT must be a valid number")?,
            secret: env::var("SECRET").context("SECRET must be set")?,
        })
    }
}
