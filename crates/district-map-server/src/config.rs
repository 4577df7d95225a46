//! # Server Configuration
//!
//! Environment-based configuration for the map server.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: AddrParseError,
    },
}

/// Map server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// Scenario folder holding `inputs/building-geometry` and `inputs/networks`
    pub scenario_dir: PathBuf,

    /// Built frontend served for every other path
    pub static_dir: PathBuf,

    /// Logging level
    pub log_level: String,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server_addr = match env::var("SERVER_ADDR") {
            Ok(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidAddr { value, source })?,
            Err(_) => defaults.server_addr,
        };

        Ok(Self {
            server_addr,
            scenario_dir: env::var("SCENARIO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scenario_dir),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.cors_origins),
        })
    }

    /// Defaults with a different scenario folder
    pub fn for_scenario(scenario_dir: impl Into<PathBuf>) -> Self {
        Self {
            scenario_dir: scenario_dir.into(),
            ..Self::default()
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 5050)),
            scenario_dir: PathBuf::from("."),
            static_dir: PathBuf::from("dist"),
            log_level: "info".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr.port(), 5050);
        assert_eq!(config.static_dir, PathBuf::from("dist"));
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:5050, http://127.0.0.1:5050,"),
            vec!["http://localhost:5050", "http://127.0.0.1:5050"]
        );
    }

    #[test]
    fn test_for_scenario() {
        let config = Config::for_scenario("/data/baseline");
        assert_eq!(config.scenario_dir, PathBuf::from("/data/baseline"));
        assert_eq!(config.log_level, "info");
    }
}
