//! HTTP recognizer for the LUIS v2 prediction API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use flightbot_config::LuisSettings;
use flightbot_core::{RecognizerResult, Turn};

use crate::application::LuisApplication;
use crate::normalize::{self, LuisResult};
use crate::RecognizerError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prediction options
#[derive(Debug, Clone)]
pub struct LuisOptions {
    /// Upper bound for one prediction request
    pub timeout: Duration,
    /// Request verbose predictions carrying the `$instance` branch
    pub include_instance_data: bool,
    /// Query the staging slot instead of the production slot
    pub staging: bool,
}

impl Default for LuisOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            include_instance_data: true,
            staging: false,
        }
    }
}

impl LuisOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_instance_data(mut self, include: bool) -> Self {
        self.include_instance_data = include;
        self
    }

    pub fn with_staging(mut self, staging: bool) -> Self {
        self.staging = staging;
        self
    }
}

/// One recognition pass over a conversation turn.
///
/// Implementations must stop work promptly once `cancellation` fires and
/// report [`RecognizerError::Cancelled`].
#[async_trait]
pub trait TurnRecognizer: Send + Sync {
    async fn recognize(
        &self,
        turn: &Turn,
        cancellation: &CancellationToken,
    ) -> Result<RecognizerResult, RecognizerError>;
}

/// LUIS v2 prediction client
pub struct LuisRecognizer {
    application: LuisApplication,
    options: LuisOptions,
    client: Client,
}

impl LuisRecognizer {
    pub fn new(
        application: LuisApplication,
        options: LuisOptions,
    ) -> Result<Self, RecognizerError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| RecognizerError::Network(e.to_string()))?;

        Ok(Self {
            application,
            options,
            client,
        })
    }

    pub fn from_settings(settings: &LuisSettings) -> Result<Self, RecognizerError> {
        let application = LuisApplication::from_settings(settings)?;
        let options = LuisOptions::default()
            .with_timeout(Duration::from_secs(settings.timeout_secs))
            .with_instance_data(settings.include_instance_data)
            .with_staging(settings.staging);
        Self::new(application, options)
    }

    pub fn application(&self) -> &LuisApplication {
        &self.application
    }

    fn prediction_url(&self) -> String {
        format!(
            "{}/luis/v2.0/apps/{}",
            self.application.endpoint, self.application.app_id
        )
    }

    async fn query(&self, text: &str) -> Result<RecognizerResult, RecognizerError> {
        let verbose = if self.options.include_instance_data {
            "true"
        } else {
            "false"
        };

        let mut request = self.client.get(self.prediction_url()).query(&[
            ("subscription-key", self.application.endpoint_key.as_str()),
            ("verbose", verbose),
            ("q", text),
        ]);
        if self.options.staging {
            request = request.query(&[("staging", "true")]);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Api(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let prediction: LuisResult = response
            .json()
            .await
            .map_err(|e| RecognizerError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            query = %text,
            entities = prediction.entities.len(),
            "LUIS prediction received"
        );

        Ok(normalize::recognizer_result(
            &prediction,
            self.options.include_instance_data,
        ))
    }
}

#[async_trait]
impl TurnRecognizer for LuisRecognizer {
    async fn recognize(
        &self,
        turn: &Turn,
        cancellation: &CancellationToken,
    ) -> Result<RecognizerResult, RecognizerError> {
        // Cancellation is checked first, so a token cancelled before the
        // call never issues a request.
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(RecognizerError::Cancelled),
            result = self.query(&turn.content) => result,
        }
    }
}
