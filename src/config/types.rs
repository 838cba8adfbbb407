use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: DefaultsConfig,
    pub timeouts: TimeoutConfig,
    pub verify: VerifyConfig,
    pub endpoints: EndpointConfig,
}

/// Default answers offered by the wizard and used by the tool server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Directory generated files are written to (current directory when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub app_port: u16,
    pub openclaw_image: String,
    pub service_name: String,
    pub min_node_major: u32,
}

/// Request timeouts, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub key_validation_ms: u64,
    pub provider_api_ms: u64,
    pub ssh_ready_ms: u64,
}

/// Post-deploy verification policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub attempts: u32,
    pub delay_ms: u64,
    pub timeout_ms: u64,
}

/// Base URLs of the external services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub render_api: String,
    pub digitalocean_api: String,
    pub openai_api: String,
    pub anthropic_api: String,
    pub gemini_api: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            app_port: 3000,
            openclaw_image: "openclaw/openclaw:latest".to_string(),
            service_name: "openclaw-easy".to_string(),
            min_node_major: 22,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            key_validation_ms: 10_000,
            provider_api_ms: 20_000,
            ssh_ready_ms: 20_000,
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            attempts: 8,
            delay_ms: 4_000,
            timeout_ms: 7_000,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            render_api: "https://api.render.com".to_string(),
            digitalocean_api: "https://api.digitalocean.com".to_string(),
            openai_api: "https://api.openai.com".to_string(),
            anthropic_api: "https://api.anthropic.com".to_string(),
            gemini_api: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl TimeoutConfig {
    pub fn key_validation(&self) -> Duration {
        Duration::from_millis(self.key_validation_ms)
    }

    pub fn provider_api(&self) -> Duration {
        Duration::from_millis(self.provider_api_ms)
    }

    pub fn ssh_ready(&self) -> Duration {
        Duration::from_millis(self.ssh_ready_ms)
    }
}
