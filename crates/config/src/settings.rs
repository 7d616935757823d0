//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// LUIS connection settings
    #[serde(default)]
    pub luis: LuisSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.luis.validate()?;
        Ok(())
    }
}

/// Connection settings for the LUIS prediction service
///
/// The field aliases accept the setting names Bot Framework bots use
/// (`LuisAppId`, `LuisAPIKey`, `LuisAPIHostName`), so an existing
/// appsettings file can be loaded unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LuisSettings {
    /// LUIS application id
    #[serde(alias = "LuisAppId")]
    pub app_id: String,

    /// Prediction endpoint key
    #[serde(alias = "LuisAPIKey")]
    pub api_key: String,

    /// Regional host name without a scheme
    /// (e.g. "westus.api.cognitive.microsoft.com")
    #[serde(alias = "LuisAPIHostName")]
    pub api_host_name: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Request the `$instance` metadata branch with each prediction
    pub include_instance_data: bool,

    /// Query the staging slot instead of the production slot
    pub staging: bool,
}

impl Default for LuisSettings {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            api_host_name: String::new(),
            timeout_secs: 30,
            include_instance_data: true,
            staging: false,
        }
    }
}

impl LuisSettings {
    /// True when all three connection values are set
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.api_key.is_empty() && !self.api_host_name.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Fully unset means LUIS is disabled; hosts skip recognition then.
        if self.app_id.is_empty() && self.api_key.is_empty() && self.api_host_name.is_empty() {
            return Ok(());
        }

        if self.app_id.is_empty() {
            return Err(ConfigError::MissingField("luis.app_id".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingField("luis.api_key".to_string()));
        }
        if self.api_host_name.is_empty() {
            return Err(ConfigError::MissingField("luis.api_host_name".to_string()));
        }

        if self.api_host_name.contains("://") {
            return Err(ConfigError::InvalidValue {
                field: "luis.api_host_name".to_string(),
                message: format!(
                    "Expected a bare host name, got '{}'",
                    self.api_host_name
                ),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "luis.timeout_secs".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info" or "flightbot_luis=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (FLIGHTBOT_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("FLIGHTBOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::new();
        assert!(!settings.luis.is_configured());
        assert_eq!(settings.luis.timeout_secs, 30);
        assert!(settings.luis.include_instance_data);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.luis.app_id = "b213cc25-a26e-4f1e-9b2d-21b4b0e8a34c".to_string();
        // Partially configured LUIS is an error
        assert!(settings.validate().is_err());

        settings.luis.api_key = "0123456789abcdef0123456789abcdef".to_string();
        settings.luis.api_host_name = "westus.api.cognitive.microsoft.com".to_string();
        assert!(settings.validate().is_ok());

        settings.luis.api_host_name = "https://westus.api.cognitive.microsoft.com".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_timeout_validation() {
        let mut settings = Settings::default();
        settings.luis.app_id = "app".to_string();
        settings.luis.api_key = "key".to_string();
        settings.luis.api_host_name = "westus.api.cognitive.microsoft.com".to_string();
        settings.luis.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bot_framework_setting_names() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "luis": {
                    "LuisAppId": "b213cc25-a26e-4f1e-9b2d-21b4b0e8a34c",
                    "LuisAPIKey": "0123456789abcdef0123456789abcdef",
                    "LuisAPIHostName": "westus.api.cognitive.microsoft.com"
                }
            }"#,
        )
        .unwrap();

        assert!(settings.luis.is_configured());
        assert_eq!(
            settings.luis.api_host_name,
            "westus.api.cognitive.microsoft.com"
        );
        assert!(settings.validate().is_ok());
    }
}
