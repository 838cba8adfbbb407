//! Step 3: LLM provider and API key
//!
//! A rejected key is not fatal. The user may retry as often as they like, or
//! continue with the key marked unverified.

use super::orchestrator::{WizardContext, WizardStep};
use super::prompt::ask_secret;
use super::render::{display_step_header, print_success, print_warning, spinner};
use super::state::WizardState;
use crate::error::{DeployError, Result};
use crate::llm::LlmProvider;
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;

/// Keys shorter than this are rejected before any request is made
pub const MIN_KEY_LENGTH: usize = 10;

pub struct ProviderSetupStep {
    context: Arc<WizardContext>,
}

impl ProviderSetupStep {
    pub fn new(context: Arc<WizardContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl WizardStep for ProviderSetupStep {
    fn name(&self) -> &'static str {
        "Configure LLM provider"
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        display_step_header(3, self.name(), "Choose a provider and check its API key.");

        let prompter = self.context.prompter.as_ref();
        let options: Vec<String> = LlmProvider::ALL
            .iter()
            .map(|p| p.display_name().to_string())
            .collect();
        let index = prompter.select("Select your LLM provider:", &options)?;
        let provider = LlmProvider::ALL
            .get(index)
            .copied()
            .ok_or_else(|| DeployError::Prompt(format!("no provider at index {}", index)))?;

        loop {
            let api_key = ask_secret(
                prompter,
                &format!("Enter your {} API key:", provider.display_name()),
                MIN_KEY_LENGTH,
                "API key looks too short.",
            )?;

            let progress = spinner("Validating API key...");
            let validation = self
                .context
                .validator
                .validate(provider, &api_key, self.context.config.timeouts.key_validation())
                .await;
            progress.finish_and_clear();

            if validation.ok {
                print_success(&validation.message);
                return Ok(state.with_provider_key(provider, api_key, true));
            }

            print_warning(&validation.message);
            if !prompter.confirm("API key validation failed. Try again?", true)? {
                warn!("Continuing with an unverified {} key", provider);
                print_warning("Continuing with unverified API key.");
                return Ok(state.with_provider_key(provider, api_key, false));
            }
        }
    }
}
