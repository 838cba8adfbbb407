//! Step 2: deployment target

use super::orchestrator::{WizardContext, WizardStep};
use super::render::{display_step_header, print_success};
use super::state::WizardState;
use crate::deploy::Platform;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub struct PlatformSelectionStep {
    context: Arc<WizardContext>,
}

impl PlatformSelectionStep {
    pub fn new(context: Arc<WizardContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl WizardStep for PlatformSelectionStep {
    fn name(&self) -> &'static str {
        "Choose deployment target"
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        display_step_header(2, self.name(), "Pick where OpenClaw should run.");

        let options: Vec<String> = Platform::ALL
            .iter()
            .map(|p| p.display_name().to_string())
            .collect();
        let index = self
            .context
            .prompter
            .select("Where do you want to deploy OpenClaw?", &options)?;
        let platform = Platform::ALL
            .get(index)
            .copied()
            .ok_or_else(|| DeployError::Prompt(format!("no platform at index {}", index)))?;

        print_success(&format!("Selected platform: {}", platform));
        Ok(state.with_platform(platform))
    }
}
