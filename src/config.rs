//! Configuration management for Haletix server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf};

use crate::services::seating::RowSpec;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the key-value store keeps its collections
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Namespace prepended to every collection key (`<prefix>_shows`, ...)
    pub key_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Seating layout of the house
#[derive(Debug, Deserialize, Clone)]
pub struct VenueConfig {
    pub section: String,
    pub rows: Vec<RowSpec>,
    pub align_aisle: bool,
    pub max_selection: usize,
    /// Horizontal footprint of one seat (seat width plus gap)
    pub unit_width: u32,
}

/// Return-deadline windows, in days
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DeadlineConfig {
    pub return_window_days: i64,
    pub stale_after_days: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub venue: VenueConfig,
    #[serde(default)]
    pub deadlines: DeadlineConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix HALETIX_)
            .add_source(
                Environment::with_prefix("HALETIX")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override data directory from DATA_DIR env var if present
            .set_override_option("storage.data_dir", env::var("DATA_DIR").ok())?
            // Override port from PORT env var if present
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            key_prefix: "haletix".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            section: "South".to_string(),
            rows: vec![
                RowSpec::new("B", 9, Some(5)),
                RowSpec::new("C", 12, Some(6)),
                RowSpec::new("D", 9, Some(2)),
            ],
            align_aisle: true,
            max_selection: 10,
            unit_width: 37,
        }
    }
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            return_window_days: 14,
            stale_after_days: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_venue_has_thirty_seats() {
        let venue = VenueConfig::default();
        let total: u32 = venue.rows.iter().map(|r| r.seats).sum();
        assert_eq!(total, 30);
        assert_eq!(venue.section, "South");
    }

    #[test]
    fn test_default_deadline_windows() {
        let deadlines = DeadlineConfig::default();
        assert_eq!(deadlines.return_window_days, 14);
        assert_eq!(deadlines.stale_after_days, 7);
    }
}
