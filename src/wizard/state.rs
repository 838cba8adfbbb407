//! State threaded through the wizard steps
//!
//! A step never edits the state it receives: it consumes it and returns an
//! extended copy built with the `with_*` methods. There is no way to clear a
//! field once it is set.

use crate::deploy::{DeploymentResult, Platform};
use crate::generator::GeneratedConfig;
use crate::llm::LlmProvider;
use secrecy::SecretString;
use std::path::{Path, PathBuf};

/// Everything the wizard has learned so far
///
/// `Debug` is safe: secrets are `SecretString` and print redacted.
#[derive(Debug, Clone)]
pub struct WizardState {
    output_dir: PathBuf,
    platform: Option<Platform>,
    provider: Option<LlmProvider>,
    api_key: Option<SecretString>,
    key_verified: Option<bool>,
    setup_password: Option<SecretString>,
    app_port: Option<u16>,
    generated: Option<GeneratedConfig>,
    deployment: Option<DeploymentResult>,
}

impl WizardState {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            platform: None,
            provider: None,
            api_key: None,
            key_verified: None,
            setup_password: None,
            app_port: None,
            generated: None,
            deployment: None,
        }
    }

    pub fn with_platform(self, platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            ..self
        }
    }

    /// Record the chosen provider and its key; `verified` is false when the
    /// user continued after a failed validation
    pub fn with_provider_key(
        self,
        provider: LlmProvider,
        api_key: SecretString,
        verified: bool,
    ) -> Self {
        Self {
            provider: Some(provider),
            api_key: Some(api_key),
            key_verified: Some(verified),
            ..self
        }
    }

    pub fn with_generated_config(
        self,
        setup_password: SecretString,
        app_port: u16,
        generated: GeneratedConfig,
    ) -> Self {
        Self {
            setup_password: Some(setup_password),
            app_port: Some(app_port),
            generated: Some(generated),
            ..self
        }
    }

    pub fn with_deployment(self, deployment: DeploymentResult) -> Self {
        Self {
            deployment: Some(deployment),
            ..self
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn provider(&self) -> Option<LlmProvider> {
        self.provider
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    pub fn key_verified(&self) -> Option<bool> {
        self.key_verified
    }

    pub fn setup_password(&self) -> Option<&SecretString> {
        self.setup_password.as_ref()
    }

    pub fn app_port(&self) -> Option<u16> {
        self.app_port
    }

    pub fn generated(&self) -> Option<&GeneratedConfig> {
        self.generated.as_ref()
    }

    pub fn deployment(&self) -> Option<&DeploymentResult> {
        self.deployment.as_ref()
    }

    /// Names of the fields that currently hold a value
    pub fn defined_fields(&self) -> Vec<&'static str> {
        [
            ("outputDir", true),
            ("platform", self.platform.is_some()),
            ("provider", self.provider.is_some()),
            ("apiKey", self.api_key.is_some()),
            ("keyVerified", self.key_verified.is_some()),
            ("setupPassword", self.setup_password.is_some()),
            ("appPort", self.app_port.is_some()),
            ("generatedConfig", self.generated.is_some()),
            ("deploymentResult", self.deployment.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}
