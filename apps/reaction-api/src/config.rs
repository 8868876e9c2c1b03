//! Command-line and environment configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use reaction_core::{StoreConfig, ValueBounds};

/// Command-line arguments for the reaction-time server
#[derive(Parser, Debug, Clone)]
#[command(name = "reaction-api")]
#[command(about = "Reaction-time statistics server")]
pub struct Config {
    /// sqlx database URL (defaults to a file in the platform data directory)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Maximum pooled database connections
    #[arg(long, default_value = "5")]
    pub max_connections: u32,

    /// Smallest accepted reaction time in milliseconds
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub min_value: f64,

    /// Largest accepted reaction time in milliseconds
    #[arg(long, default_value = "60000")]
    pub max_value: f64,

    /// Lifetime of the user identifier cookie
    #[arg(long, default_value = "365")]
    pub cookie_max_age_days: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn store_config(&self) -> StoreConfig {
        let database_url = self.database_url.clone().unwrap_or_else(|| {
            let data_dir = default_data_dir();
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/reaction.db?mode=rwc", data_dir.display())
        });

        StoreConfig {
            database_url,
            max_connections: self.max_connections,
        }
    }

    pub fn bounds(&self) -> Result<ValueBounds> {
        ensure!(
            self.min_value.is_finite() && self.max_value.is_finite(),
            "value bounds must be finite"
        );
        ensure!(
            self.min_value <= self.max_value,
            "--min-value ({}) must not exceed --max-value ({})",
            self.min_value,
            self.max_value
        );
        Ok(ValueBounds {
            min: self.min_value,
            max: self.max_value,
        })
    }

    pub fn cookie_max_age_secs(&self) -> u64 {
        u64::from(self.cookie_max_age_days) * 24 * 60 * 60
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Directory holding the reaction-time database when no URL is given.
///
/// Per-platform user data location with `reaction-time` appended; empty
/// environment values are treated as unset. Falls back to the working
/// directory.
fn default_data_dir() -> PathBuf {
    let env_dir = |key: &str| {
        std::env::var_os(key)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let base = if cfg!(target_os = "windows") {
        env_dir("APPDATA")
    } else if cfg!(target_os = "macos") {
        env_dir("HOME").map(|h| h.join("Library/Application Support"))
    } else {
        env_dir("XDG_DATA_HOME").or_else(|| env_dir("HOME").map(|h| h.join(".local/share")))
    };

    base.unwrap_or_else(|| PathBuf::from(".")).join("reaction-time")
}
