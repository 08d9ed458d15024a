//! OpenAI-compatible provider implementation

use super::convert::to_openai_request;
use super::stream::create_stream;
use super::types::OpenAIConfig;
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateStream, Headers};
use async_trait::async_trait;
use reqwest::Client;

/// OpenAI-compatible streaming provider
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Create a new provider
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey("openai".to_string()));
        }

        let client = Client::new();
        Ok(Self { config, client })
    }

    /// Create a provider for the given key and endpoint
    pub fn with_credentials(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::new(OpenAIConfig::new(api_key).with_base_url(base_url))
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();

        headers.insert("Authorization", format!("Bearer {}", self.config.api_key));
        headers.insert("Content-Type", "application/json");

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream> {
        let url = self.config.completions_url();
        let body = to_openai_request(&request);

        let headers = self.build_headers(request.options.headers.as_ref());

        let req_builder = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&body);

        tracing::debug!(url = %url, model = %request.model, messages = request.messages.len(), "opening completion stream");

        let mut event_source = reqwest_eventsource::EventSource::new(req_builder)
            .map_err(|e| Error::connection_error(format!("Failed to create event source: {}", e)))?;
        // A reconnect would replay the completion from the start.
        event_source.set_retry_policy(Box::new(reqwest_eventsource::retry::Never));

        create_stream(event_source).await
    }
}
