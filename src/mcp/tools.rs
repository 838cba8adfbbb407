//! Tool definitions for the MCP server
//!
//! Every tool has a typed input struct. Its JSON schema is published through
//! `tools/list`, and the same constraints are checked in `validate` before the
//! tool touches anything.

use crate::common::expand_home;
use crate::config::AppConfig;
use crate::deploy::digitalocean::{DEFAULT_IMAGE, DEFAULT_REGION, DEFAULT_SIZE};
use crate::deploy::vps::{DEFAULT_SETUP_SCRIPT, DEFAULT_SSH_PORT};
use crate::deploy::{
    DeployTarget, DeploymentBackend, DropletRequest, Platform, RenderDeployRequest, SshAuth,
    SshKeyRef, SshTarget, VpsDeployRequest,
};
use crate::error::{DeployError, Result};
use crate::generator::{generate_config, ConfigRequest};
use crate::llm::{ApiKeyValidator, LlmProvider, MAX_KEY_TIMEOUT};
use crate::probe::{check_docker, check_node};
use log::debug;
use schemars::{schema_for, JsonSchema};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const MIN_SECRET_LENGTH: usize = 10;
const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckNodeInput {
    /// Minimum supported Node.js major version (default 22)
    #[schemars(range(min = 1))]
    pub minimum_major: Option<u32>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CheckDockerInput {}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateKeyInput {
    pub provider: LlmProvider,
    #[schemars(length(min = 10))]
    pub api_key: String,
    #[schemars(range(min = 1, max = 30000))]
    pub timeout_ms: Option<u64>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenConfigInput {
    pub output_dir: Option<PathBuf>,
    pub platform: Platform,
    pub provider: LlmProvider,
    #[schemars(length(min = 10))]
    pub api_key: String,
    #[schemars(length(min = 8))]
    pub setup_password: String,
    #[schemars(range(min = 1, max = 65535))]
    pub app_port: Option<u32>,
    pub openclaw_image: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeployRenderInput {
    #[schemars(length(min = 10))]
    pub api_token: String,
    pub render_yaml_path: PathBuf,
    pub dry_run: Option<bool>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeployDoInput {
    #[schemars(length(min = 10))]
    pub api_token: String,
    #[schemars(length(min = 1))]
    pub droplet_name: String,
    pub region: Option<String>,
    pub size: Option<String>,
    pub image: Option<String>,
    /// SSH key IDs or fingerprints registered with DigitalOcean
    pub ssh_keys: Option<Vec<SshKeyRef>>,
    /// Cloud-init boot script
    pub user_data: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeployVpsInput {
    #[schemars(length(min = 1))]
    pub host: String,
    #[schemars(range(min = 1, max = 65535))]
    pub port: Option<u32>,
    #[schemars(length(min = 1))]
    pub username: String,
    /// Exactly one of `password` and `privateKeyPath` is required
    pub password: Option<String>,
    pub private_key_path: Option<String>,
    pub setup_script: Option<String>,
    #[schemars(range(min = 1, max = 65535))]
    pub app_port: Option<u32>,
}

fn require_min_len(field: &str, value: &str, min: usize) -> Result<()> {
    if value.trim().chars().count() < min {
        return Err(DeployError::validation(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    Ok(())
}

fn port_or(field: &str, value: Option<u32>, default: u16) -> Result<u16> {
    match value {
        None => Ok(default),
        Some(port) => u16::try_from(port)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| DeployError::validation(field, "must be between 1 and 65535")),
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl CheckNodeInput {
    pub fn validate(&self) -> Result<()> {
        if self.minimum_major == Some(0) {
            return Err(DeployError::validation("minimumMajor", "must be at least 1"));
        }
        Ok(())
    }
}

impl ValidateKeyInput {
    pub fn validate(&self) -> Result<()> {
        require_min_len("apiKey", &self.api_key, MIN_SECRET_LENGTH)?;
        if let Some(ms) = self.timeout_ms {
            if ms == 0 || Duration::from_millis(ms) > MAX_KEY_TIMEOUT {
                return Err(DeployError::validation(
                    "timeoutMs",
                    "must be between 1 and 30000",
                ));
            }
        }
        Ok(())
    }
}

impl GenConfigInput {
    pub fn validate(&self) -> Result<()> {
        require_min_len("apiKey", &self.api_key, MIN_SECRET_LENGTH)?;
        if self.setup_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DeployError::validation(
                "setupPassword",
                "must be at least 8 characters",
            ));
        }
        port_or("appPort", self.app_port, 1)?;
        Ok(())
    }
}

impl DeployRenderInput {
    pub fn validate(&self) -> Result<()> {
        require_min_len("apiToken", &self.api_token, MIN_SECRET_LENGTH)?;
        if self.render_yaml_path.as_os_str().is_empty() {
            return Err(DeployError::validation("renderYamlPath", "is required"));
        }
        Ok(())
    }
}

impl DeployDoInput {
    pub fn validate(&self) -> Result<()> {
        require_min_len("apiToken", &self.api_token, MIN_SECRET_LENGTH)?;
        require_min_len("dropletName", &self.droplet_name, 1)
    }
}

impl DeployVpsInput {
    pub fn validate(&self) -> Result<()> {
        require_min_len("host", &self.host, 1)?;
        require_min_len("username", &self.username, 1)?;
        port_or("port", self.port, DEFAULT_SSH_PORT)?;
        port_or("appPort", self.app_port, 1)?;
        Ok(())
    }
}

/// The tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    CheckNode,
    CheckDocker,
    ValidateKey,
    GenConfig,
    DeployRender,
    DeployDo,
    DeployVps,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::CheckNode,
        Tool::CheckDocker,
        Tool::ValidateKey,
        Tool::GenConfig,
        Tool::DeployRender,
        Tool::DeployDo,
        Tool::DeployVps,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::CheckNode => "check-node",
            Tool::CheckDocker => "check-docker",
            Tool::ValidateKey => "validate-key",
            Tool::GenConfig => "gen-config",
            Tool::DeployRender => "deploy-render",
            Tool::DeployDo => "deploy-do",
            Tool::DeployVps => "deploy-vps",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::CheckNode => "Verify local Node.js runtime version.",
            Tool::CheckDocker => "Check Docker installation and runtime.",
            Tool::ValidateKey => {
                "Validate LLM provider API key by making a minimal provider request."
            }
            Tool::GenConfig => "Generate .env and docker-compose.yml from templates.",
            Tool::DeployRender => "Deploy OpenClaw through Render API using render.yaml blueprint.",
            Tool::DeployDo => "Create a DigitalOcean Droplet for OpenClaw.",
            Tool::DeployVps => "Deploy OpenClaw to a custom VPS over SSH.",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.name() == name)
    }

    /// JSON schema of the tool's arguments
    pub fn input_schema(&self) -> Result<Value> {
        let schema = match self {
            Tool::CheckNode => schema_for!(CheckNodeInput),
            Tool::CheckDocker => schema_for!(CheckDockerInput),
            Tool::ValidateKey => schema_for!(ValidateKeyInput),
            Tool::GenConfig => schema_for!(GenConfigInput),
            Tool::DeployRender => schema_for!(DeployRenderInput),
            Tool::DeployDo => schema_for!(DeployDoInput),
            Tool::DeployVps => schema_for!(DeployVpsInput),
        };
        Ok(serde_json::to_value(schema)?)
    }
}

/// Parse tool arguments; a missing argument object counts as `{}`
pub fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T> {
    let arguments = match arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(value) => value,
    };
    serde_json::from_value(arguments)
        .map_err(|e| DeployError::validation("arguments", e.to_string()))
}

/// Runs tools against the configured collaborators
pub struct ToolRegistry {
    config: AppConfig,
    validator: Arc<dyn ApiKeyValidator>,
    backend: Arc<dyn DeploymentBackend>,
}

impl ToolRegistry {
    pub fn new(
        config: AppConfig,
        validator: Arc<dyn ApiKeyValidator>,
        backend: Arc<dyn DeploymentBackend>,
    ) -> Self {
        Self {
            config,
            validator,
            backend,
        }
    }

    /// Run `tool` and return its output as JSON
    ///
    /// Invalid arguments come back as `DeployError::Validation` before any
    /// side effect. Failed deployments are not errors; they are results with
    /// `ok: false`.
    pub async fn call(&self, tool: Tool, arguments: Option<Value>) -> Result<Value> {
        debug!("Calling tool {}", tool.name());
        match tool {
            Tool::CheckNode => {
                let input: CheckNodeInput = parse_args(arguments)?;
                input.validate()?;
                let minimum = input
                    .minimum_major
                    .unwrap_or(self.config.defaults.min_node_major);
                Ok(serde_json::to_value(check_node(minimum).await)?)
            }
            Tool::CheckDocker => {
                let _input: CheckDockerInput = parse_args(arguments)?;
                Ok(serde_json::to_value(check_docker().await)?)
            }
            Tool::ValidateKey => {
                let input: ValidateKeyInput = parse_args(arguments)?;
                input.validate()?;
                let timeout = input
                    .timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| self.config.timeouts.key_validation());
                let key = SecretString::from(input.api_key.trim().to_string());
                let result = self.validator.validate(input.provider, &key, timeout).await;
                Ok(serde_json::to_value(result)?)
            }
            Tool::GenConfig => {
                let input: GenConfigInput = parse_args(arguments)?;
                input.validate()?;
                let defaults = &self.config.defaults;
                let request = ConfigRequest {
                    output_dir: input
                        .output_dir
                        .unwrap_or_else(|| self.config.output_dir()),
                    platform: input.platform,
                    provider: input.provider,
                    api_key: SecretString::from(input.api_key.trim().to_string()),
                    setup_password: SecretString::from(input.setup_password),
                    app_port: port_or("appPort", input.app_port, defaults.app_port)?,
                    openclaw_image: non_empty_or(input.openclaw_image, &defaults.openclaw_image),
                    service_name: non_empty_or(input.service_name, &defaults.service_name),
                };
                Ok(serde_json::to_value(generate_config(&request)?)?)
            }
            Tool::DeployRender => {
                let input: DeployRenderInput = parse_args(arguments)?;
                input.validate()?;
                let target = DeployTarget::Render(RenderDeployRequest {
                    api_token: SecretString::from(input.api_token.trim().to_string()),
                    blueprint_path: input.render_yaml_path,
                    dry_run: input.dry_run.unwrap_or(false),
                });
                Ok(serde_json::to_value(self.backend.deploy(target).await)?)
            }
            Tool::DeployDo => {
                let input: DeployDoInput = parse_args(arguments)?;
                input.validate()?;
                let target = DeployTarget::DigitalOcean(DropletRequest {
                    api_token: SecretString::from(input.api_token.trim().to_string()),
                    name: input.droplet_name.trim().to_string(),
                    region: non_empty_or(input.region, DEFAULT_REGION),
                    size: non_empty_or(input.size, DEFAULT_SIZE),
                    image: non_empty_or(input.image, DEFAULT_IMAGE),
                    ssh_keys: input.ssh_keys.unwrap_or_default(),
                    user_data: input.user_data,
                });
                Ok(serde_json::to_value(self.backend.deploy(target).await)?)
            }
            Tool::DeployVps => {
                let input: DeployVpsInput = parse_args(arguments)?;
                input.validate()?;
                let auth = SshAuth::from_options(
                    input.password.filter(|p| !p.is_empty()).map(SecretString::from),
                    input
                        .private_key_path
                        .filter(|p| !p.trim().is_empty())
                        .map(|p| expand_home(p.trim())),
                )?;
                let target = DeployTarget::Vps(VpsDeployRequest {
                    target: SshTarget {
                        host: input.host.trim().to_string(),
                        port: port_or("port", input.port, DEFAULT_SSH_PORT)?,
                        username: input.username.trim().to_string(),
                        auth,
                    },
                    setup_script: input
                        .setup_script
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_SETUP_SCRIPT.to_string()),
                    app_port: port_or("appPort", input.app_port, self.config.defaults.app_port)?,
                });
                Ok(serde_json::to_value(self.backend.deploy(target).await)?)
            }
        }
    }
}
