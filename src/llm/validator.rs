//! API key validation
//!
//! Each provider is checked with one read-only listing request. The validator
//! never retries: whether to ask for another key is the caller's decision.

use super::LlmProvider;
use crate::config::EndpointConfig;
use crate::error::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

/// Default per-request timeout for key validation
pub const DEFAULT_KEY_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Upper bound on the caller-supplied timeout
pub const MAX_KEY_TIMEOUT: Duration = Duration::from_millis(30_000);

const ANTHROPIC_VERSION: &str = "2023-06-01";
const USER_AGENT: &str = concat!("openclaw-deploy/", env!("CARGO_PKG_VERSION"));

/// Outcome of a key validation; never contains the key itself
#[derive(Debug, Clone, Serialize)]
pub struct KeyValidation {
    pub ok: bool,
    pub provider: LlmProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

/// Checks whether a provider accepts an API key
#[async_trait]
pub trait ApiKeyValidator: Send + Sync {
    async fn validate(
        &self,
        provider: LlmProvider,
        api_key: &SecretString,
        timeout: Duration,
    ) -> KeyValidation;
}

/// Validator that talks to the real provider APIs
pub struct HttpKeyValidator {
    http_client: Client,
    endpoints: EndpointConfig,
}

impl HttpKeyValidator {
    pub fn new(endpoints: EndpointConfig) -> Result<Self> {
        let http_client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http_client,
            endpoints,
        })
    }

    fn build_request(&self, provider: LlmProvider, api_key: &str) -> reqwest::RequestBuilder {
        match provider {
            LlmProvider::OpenAi => self
                .http_client
                .get(format!("{}/v1/models", self.endpoints.openai_api))
                .bearer_auth(api_key),
            LlmProvider::Anthropic => self
                .http_client
                .get(format!("{}/v1/models", self.endpoints.anthropic_api))
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            LlmProvider::Gemini => self
                .http_client
                .get(format!(
                    "{}/v1beta/models?key={}",
                    self.endpoints.gemini_api,
                    urlencoding::encode(api_key)
                ))
                .header("Content-Type", "application/json"),
        }
    }
}

#[async_trait]
impl ApiKeyValidator for HttpKeyValidator {
    async fn validate(
        &self,
        provider: LlmProvider,
        api_key: &SecretString,
        timeout: Duration,
    ) -> KeyValidation {
        let timeout = clamp_timeout(timeout);
        debug!(
            "Validating {} API key (timeout {} ms)",
            provider,
            timeout.as_millis()
        );

        let response = self
            .build_request(provider, api_key.expose_secret())
            .timeout(timeout)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                classify_status(provider, status.as_u16(), status.is_success())
            }
            // Gemini carries the key in the query string; drop the URL so it
            // cannot end up in the message.
            Err(e) => {
                let e = e.without_url();
                let message = if e.is_timeout() {
                    format!(
                        "Key validation request timed out after {} ms.",
                        timeout.as_millis()
                    )
                } else {
                    format!("Key validation request failed: {}", e)
                };
                KeyValidation {
                    ok: false,
                    provider,
                    status: None,
                    message,
                }
            }
        }
    }
}

/// Bound a caller-supplied timeout to `MAX_KEY_TIMEOUT`
pub fn clamp_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        DEFAULT_KEY_TIMEOUT
    } else {
        timeout.min(MAX_KEY_TIMEOUT)
    }
}

fn classify_status(provider: LlmProvider, status: u16, success: bool) -> KeyValidation {
    let message = if success {
        format!("{} API key is valid.", provider.display_name())
    } else {
        format!(
            "{} key validation failed ({}).",
            provider.display_name(),
            status
        )
    };
    KeyValidation {
        ok: success,
        provider,
        status: Some(status),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_timeout() {
        assert_eq!(clamp_timeout(Duration::from_secs(90)), MAX_KEY_TIMEOUT);
        assert_eq!(clamp_timeout(Duration::ZERO), DEFAULT_KEY_TIMEOUT);
        assert_eq!(
            clamp_timeout(Duration::from_millis(1500)),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_classify_status() {
        let ok = classify_status(LlmProvider::Anthropic, 200, true);
        assert!(ok.ok);
        assert_eq!(ok.message, "Anthropic API key is valid.");

        let rejected = classify_status(LlmProvider::OpenAi, 401, false);
        assert!(!rejected.ok);
        assert_eq!(rejected.status, Some(401));
        assert_eq!(rejected.message, "OpenAI key validation failed (401).");
    }
}
