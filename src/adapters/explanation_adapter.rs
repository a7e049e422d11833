//! # Explanation Adapter
//!
//! `ExplanationPort` backed by the Gemini `generateContent` endpoint.

use crate::client::gemini::{
    build_prompt, GenerateContentRequest, GenerateContentResponse, SERVICE,
};
use crate::client::HttpClientConfig;
use crate::config::ExplanationConfig;
use crate::error::AdapterError;
use crate::ports::ExplanationPort;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Gemini explanation adapter
#[derive(Clone)]
pub struct ExplanationAdapter {
    client: Client,
    config: ExplanationConfig,
}

impl std::fmt::Debug for ExplanationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationAdapter")
            .field("client", &"reqwest::Client")
            .field("config", &self.config)
            .finish()
    }
}

impl ExplanationAdapter {
    /// Create a new adapter. A missing API key is not an error here; calls
    /// report it as a missing credential instead.
    pub fn new(config: ExplanationConfig) -> Result<Self> {
        info!("Initializing ExplanationAdapter with model {}", config.model);
        if config.api_key.is_none() {
            warn!("GEMINI_API_KEY is not set, explanations will be unavailable");
        }

        let client = HttpClientConfig::with_timeout_secs(config.timeout_secs).build()?;

        Ok(Self { client, config })
    }

    /// `generateContent` URL for the configured model, without credentials
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

#[async_trait]
impl ExplanationPort for ExplanationAdapter {
    #[instrument(skip(self, summary), fields(model = %self.config.model))]
    async fn try_explain(
        &self,
        title: &str,
        summary: &str,
    ) -> std::result::Result<String, AdapterError> {
        let Some(api_key) = self.api_key() else {
            return Err(AdapterError::MissingCredential { service: SERVICE });
        };

        let request = GenerateContentRequest::from_prompt(build_prompt(title, summary));
        info!("Asking Gemini for an explanation of '{}'", title);

        let start_time = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| AdapterError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdapterError::from_reqwest(SERVICE, e))?;
        let parsed: GenerateContentResponse =
            serde_json::from_slice(&body).map_err(|e| AdapterError::malformed(SERVICE, &e))?;

        let explanation = parsed.into_explanation()?;
        info!("Gemini explanation received in {:?}", start_time.elapsed());

        Ok(explanation)
    }
}
