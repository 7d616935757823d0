//! Configuration management for the flight-booking agent
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files (`config/default.*`, plus an optional
//!   environment-specific file)
//! - Environment variables (FLIGHTBOT_ prefix)

pub mod settings;

pub use settings::{load_settings, LoggingConfig, LuisSettings, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
