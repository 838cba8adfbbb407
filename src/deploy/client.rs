//! HTTP client for the cloud provider APIs
//!
//! Unlike a typical API client, non-2xx responses are not errors here: the
//! status and body are handed back so the backend can report them in a
//! `DeploymentResult`. Only transport failures surface as `Err`.

use crate::config::EndpointConfig;
use crate::error::Result;
use log::debug;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// User agent for API requests
const USER_AGENT: &str = concat!("openclaw-deploy/", env!("CARGO_PKG_VERSION"));

/// Status and decoded body of a provider API response
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    /// Parsed JSON body, or `{"raw": "<text>"}` when the body is not JSON
    pub body: Value,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Client for the Render and DigitalOcean APIs
#[derive(Debug, Clone)]
pub struct CloudApiClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    endpoints: EndpointConfig,
}

impl CloudApiClient {
    /// Create a client whose requests time out after `timeout`
    pub fn new(endpoints: EndpointConfig, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    /// Make an authenticated POST request with a JSON body
    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        token: &SecretString,
        body: &B,
    ) -> Result<ApiReply> {
        debug!("POST {}", url);
        let response = self
            .http_client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        debug!("POST {} -> {}", url, status);

        Ok(ApiReply {
            status,
            body: parse_body(&text),
        })
    }
}

/// Decode a response body, keeping non-JSON text under a `raw` key
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}
