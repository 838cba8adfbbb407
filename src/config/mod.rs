pub mod types;

pub use types::{AppConfig, DefaultsConfig, EndpointConfig, TimeoutConfig, VerifyConfig};

use crate::error::{DeployError, Result};
use crate::llm::MAX_KEY_TIMEOUT;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".openclaw-deploy.toml";

/// Optional dotenv file holding `OPENCLAW_*` overrides for this tool
pub const ENV_FILE_NAME: &str = ".openclaw-deploy.env";

/// Get the global config file path (~/.openclaw-deploy.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (./.openclaw-deploy.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from file or use defaults
///
/// An explicit path must exist and parse. Otherwise the local config in the
/// working directory is tried first, then the global one; unreadable files are
/// skipped with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path).map_err(|e| {
            DeployError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        return parse_config(&content)
            .map_err(|e| DeployError::Config(format!("{}: {}", path.display(), e)));
    }

    let candidates = std::env::current_dir()
        .ok()
        .map(|cwd| local_config_path(&cwd))
        .into_iter()
        .chain(global_config_path());

    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match fs::read_to_string(&candidate)
            .map_err(|e| e.to_string())
            .and_then(|c| parse_config(&c))
        {
            Ok(config) => {
                debug!("Loaded configuration from {}", candidate.display());
                return Ok(config);
            }
            Err(e) => warn!("Ignoring {}: {}", candidate.display(), e),
        }
    }

    Ok(AppConfig::default())
}

/// Load `dir/.openclaw-deploy.env` into the process environment, if present
///
/// The generated `.env` is never read here; its port and secrets belong to
/// the deployment, not to this tool.
pub fn load_env_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(ENV_FILE_NAME);
    if !path.is_file() {
        return None;
    }
    match dotenv::from_path(&path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

/// Parse a TOML configuration document and check its values
pub fn parse_config(content: &str) -> std::result::Result<AppConfig, String> {
    let config: AppConfig = toml::from_str(content).map_err(|e| e.to_string())?;
    config.check()?;
    Ok(config)
}

impl AppConfig {
    /// Reject values no operation can run with
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(DeployError::Config)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.defaults.app_port == 0 {
            return Err("defaults.app_port must be between 1 and 65535".to_string());
        }
        if self.defaults.min_node_major == 0 {
            return Err("defaults.min_node_major must be at least 1".to_string());
        }
        if self.verify.attempts == 0 {
            return Err("verify.attempts must be at least 1".to_string());
        }
        if self.verify.timeout_ms == 0 {
            return Err("verify.timeout_ms must be greater than 0".to_string());
        }
        let key_timeout = self.timeouts.key_validation();
        if key_timeout.is_zero() || key_timeout > MAX_KEY_TIMEOUT {
            return Err(format!(
                "timeouts.key_validation_ms must be between 1 and {}",
                MAX_KEY_TIMEOUT.as_millis()
            ));
        }
        if self.timeouts.provider_api_ms == 0 {
            return Err("timeouts.provider_api_ms must be greater than 0".to_string());
        }
        if self.timeouts.ssh_ready_ms == 0 {
            return Err("timeouts.ssh_ready_ms must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Apply `OPENCLAW_*` environment overrides through `lookup`
    ///
    /// The lookup is injected so callers decide where values come from; the
    /// binary passes the process environment once at startup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("OPENCLAW_OUTPUT_DIR").filter(|v| !v.trim().is_empty()) {
            self.defaults.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(image) = lookup("OPENCLAW_IMAGE").filter(|v| !v.trim().is_empty()) {
            self.defaults.openclaw_image = image;
        }
        if let Some(name) = lookup("OPENCLAW_SERVICE_NAME").filter(|v| !v.trim().is_empty()) {
            self.defaults.service_name = name;
        }
        if let Some(port) = lookup("OPENCLAW_PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) if p > 0 => self.defaults.app_port = p,
                _ => warn!("Ignoring invalid OPENCLAW_PORT value {:?}", port),
            }
        }
        self
    }

    /// Output directory to use, falling back to the current directory
    pub fn output_dir(&self) -> PathBuf {
        self.defaults
            .output_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
