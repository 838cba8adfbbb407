//! Step 4: write `.env`, compose file and blueprint

use super::orchestrator::{WizardContext, WizardStep};
use super::prompt::{validate_non_empty, validate_port};
use super::render::{display_step_header, print_success, print_warning, spinner};
use super::state::WizardState;
use crate::error::{DeployError, Result};
use crate::generator::{generate_config, ConfigRequest};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use colored::Colorize;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct ConfigGenerationStep {
    context: Arc<WizardContext>,
}

impl ConfigGenerationStep {
    pub fn new(context: Arc<WizardContext>) -> Self {
        Self { context }
    }

    /// Blank input takes a generated password
    fn ask_setup_password(&self) -> Result<SecretString> {
        loop {
            let answer = self
                .context
                .prompter
                .secret("Set an OpenClaw setup/admin password (blank to generate):")?;
            let value = answer.expose_secret();
            if value.is_empty() {
                print_success("Generated a random setup password.");
                return Ok(generate_password());
            }
            if value.chars().count() >= MIN_PASSWORD_LENGTH {
                return Ok(answer);
            }
            print_warning("Use at least 8 characters.");
        }
    }
}

/// 12 random bytes, base64url without padding
pub fn generate_password() -> SecretString {
    let mut bytes = [0u8; 12];
    rand::rng().fill(&mut bytes);
    SecretString::from(URL_SAFE_NO_PAD.encode(bytes))
}

#[async_trait]
impl WizardStep for ConfigGenerationStep {
    fn name(&self) -> &'static str {
        "Generate configuration files"
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        display_step_header(4, self.name(), "Render .env and deployment templates.");

        let (Some(platform), Some(provider), Some(api_key)) =
            (state.platform(), state.provider(), state.api_key())
        else {
            return Err(DeployError::Precondition(
                "Platform/provider/apiKey must be set before generating config.".to_string(),
            ));
        };

        let defaults = &self.context.config.defaults;
        let setup_password = self.ask_setup_password()?;
        let default_port = defaults.app_port.to_string();
        let app_port = self
            .context
            .prompter
            .text("Public port for OpenClaw:", Some(default_port.as_str()), Some(validate_port))?
            .trim()
            .parse::<u16>()
            .map_err(|e| DeployError::validation("appPort", e.to_string()))?;
        let service_name = self
            .context
            .prompter
            .text(
                "Service name for cloud deploy templates:",
                Some(defaults.service_name.as_str()),
                Some(validate_non_empty),
            )?
            .trim()
            .to_string();

        let request = ConfigRequest {
            output_dir: state.output_dir().to_path_buf(),
            platform,
            provider,
            api_key: api_key.clone(),
            setup_password: setup_password.clone(),
            app_port,
            openclaw_image: defaults.openclaw_image.clone(),
            service_name,
        };

        let progress = spinner("Generating .env and deployment templates...");
        let generated = generate_config(&request);
        progress.finish_and_clear();
        let generated = generated?;

        print_success("Configuration files generated.");
        println!("\n{}", "Generated .env preview:".bold());
        for line in generated.env_preview.lines() {
            println!("  {}", line.dimmed());
        }

        Ok(state.with_generated_config(setup_password, app_port, generated))
    }
}
