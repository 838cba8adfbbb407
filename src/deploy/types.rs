//! Types shared by every deployment backend

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment targets supported by the wizard and the tool server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Render managed PaaS, driven by a `render.yaml` blueprint
    Render,
    /// DigitalOcean Droplet created through the public API
    #[serde(rename = "digitalocean")]
    DigitalOcean,
    /// Any host reachable over SSH
    Vps,
    /// Docker Compose on this machine
    Local,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Render,
        Platform::DigitalOcean,
        Platform::Vps,
        Platform::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Render => "render",
            Platform::DigitalOcean => "digitalocean",
            Platform::Vps => "vps",
            Platform::Local => "local",
        }
    }

    /// Label shown in the platform picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Render => "Render",
            Platform::DigitalOcean => "DigitalOcean",
            Platform::Vps => "Custom VPS (SSH)",
            Platform::Local => "Local (Docker on this machine)",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown platform '{}' (expected one of: render, digitalocean, vps, local)",
                    s
                )
            })
    }
}

/// Uniform outcome of a deployment attempt
///
/// Fields are private so a URL can only be attached to a successful result.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    ok: bool,
    platform: Platform,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<serde_json::Value>,
}

impl DeploymentResult {
    /// A successful deployment, optionally reachable at `url`
    pub fn succeeded(platform: Platform, message: impl Into<String>, url: Option<String>) -> Self {
        Self {
            ok: true,
            platform,
            message: message.into(),
            url,
            raw: None,
        }
    }

    /// A reported failure; never carries a URL
    pub fn failed(platform: Platform, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            platform,
            message: message.into(),
            url: None,
            raw: None,
        }
    }

    /// Attach a backend-specific diagnostic payload
    pub fn with_raw(mut self, raw: impl Serialize) -> Self {
        self.raw = serde_json::to_value(raw).ok();
        self
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Opaque diagnostic payload, for debugging only
    pub fn raw(&self) -> Option<&serde_json::Value> {
        self.raw.as_ref()
    }
}
