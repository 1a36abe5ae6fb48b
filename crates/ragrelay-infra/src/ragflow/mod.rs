//! RagFlowProvider -- concrete [`RagProvider`] implementation for a
//! RAGFlow-style completion API.
//!
//! Wire contract: `POST {base_url}/api/v1/completion` with a JSON body
//! `{question, conversation_id, stream: false}` and a bearer API key.
//! The response envelope is `{code, message?, data: {answer}}`; a
//! non-zero `code` is a provider-side failure.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output. Every request carries a
//! bounded timeout; there is no retry or backoff -- exactly one attempt
//! per invocation, and every failure mode (transport error, timeout,
//! non-2xx status, non-zero envelope code, malformed body) collapses
//! into the single [`ProviderError::Unavailable`] kind.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use ragrelay_core::provider::RagProvider;
use ragrelay_types::config::ProviderConfig;
use ragrelay_types::error::ProviderError;

use self::types::{CompletionRequest, CompletionResponse};

/// RAGFlow completion API client.
pub struct RagFlowProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl RagFlowProvider {
    /// Create a new provider client from configuration.
    pub fn new(config: &ProviderConfig, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/api/v1/completion", self.base_url)
    }
}

// RagFlowProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state including the API key.

impl RagProvider for RagFlowProvider {
    fn name(&self) -> &str {
        "ragflow"
    }

    async fn ask(&self, question: &str, conversation_id: &str) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            question,
            conversation_id,
            stream: false,
        };

        debug!(conversation_id, "sending completion request");

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unavailable(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("malformed response: {e}")))?;

        if parsed.code != 0 {
            return Err(ProviderError::Unavailable(format!(
                "provider code {}: {}",
                parsed.code,
                parsed.message.unwrap_or_default()
            )));
        }

        parsed
            .data
            .map(|d| d.answer)
            .ok_or_else(|| ProviderError::Unavailable("response missing answer".to_string()))
    }
}
