//! LUIS application connection descriptor

use flightbot_config::LuisSettings;

use crate::RecognizerError;

/// Connection descriptor for one LUIS application.
///
/// Assembled once from configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuisApplication {
    /// LUIS application id
    pub app_id: String,
    /// Prediction endpoint key
    pub endpoint_key: String,
    /// Full endpoint URL, scheme included
    pub endpoint: String,
}

impl LuisApplication {
    /// Create a descriptor from explicit values.
    ///
    /// `endpoint` must carry its scheme; tests may point it at a plain-http
    /// mock server.
    pub fn new(
        app_id: impl Into<String>,
        endpoint_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, RecognizerError> {
        let app_id = app_id.into();
        let endpoint_key = endpoint_key.into();
        let endpoint = endpoint.into();

        if app_id.is_empty() {
            return Err(RecognizerError::Configuration(
                "LUIS application id not set".to_string(),
            ));
        }
        if endpoint_key.is_empty() {
            return Err(RecognizerError::Configuration(
                "LUIS endpoint key not set".to_string(),
            ));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(RecognizerError::Configuration(format!(
                "LUIS endpoint must include a scheme, got '{}'",
                endpoint
            )));
        }

        Ok(Self {
            app_id,
            endpoint_key,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Build the descriptor from configuration, prefixing the regional host
    /// name with the https scheme.
    pub fn from_settings(settings: &LuisSettings) -> Result<Self, RecognizerError> {
        if settings.api_host_name.is_empty() {
            return Err(RecognizerError::Configuration(
                "LUIS host name not set".to_string(),
            ));
        }

        Self::new(
            settings.app_id.clone(),
            settings.api_key.clone(),
            format!("https://{}", settings.api_host_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LuisSettings {
        LuisSettings {
            app_id: "b213cc25-a26e-4f1e-9b2d-21b4b0e8a34c".to_string(),
            api_key: "0123456789abcdef0123456789abcdef".to_string(),
            api_host_name: "westus.api.cognitive.microsoft.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_settings_prefixes_scheme() {
        let application = LuisApplication::from_settings(&settings()).unwrap();
        assert_eq!(
            application.endpoint,
            "https://westus.api.cognitive.microsoft.com"
        );
        assert_eq!(application.app_id, "b213cc25-a26e-4f1e-9b2d-21b4b0e8a34c");
    }

    #[test]
    fn test_missing_values_are_rejected() {
        let mut incomplete = settings();
        incomplete.app_id.clear();
        assert!(matches!(
            LuisApplication::from_settings(&incomplete),
            Err(RecognizerError::Configuration(_))
        ));

        let mut incomplete = settings();
        incomplete.api_host_name.clear();
        assert!(matches!(
            LuisApplication::from_settings(&incomplete),
            Err(RecognizerError::Configuration(_))
        ));
    }

    #[test]
    fn test_explicit_endpoint() {
        let application =
            LuisApplication::new("app", "key", "http://127.0.0.1:5000/").unwrap();
        assert_eq!(application.endpoint, "http://127.0.0.1:5000");

        assert!(matches!(
            LuisApplication::new("app", "key", "westus.api.cognitive.microsoft.com"),
            Err(RecognizerError::Configuration(_))
        ));
    }
}
