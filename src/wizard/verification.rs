//! Step 6: check that the deployed service answers
//!
//! Never fails the run. Anything short of a live service is a warning.

use super::orchestrator::{WizardContext, WizardStep};
use super::render::{display_step_header, print_success, print_warning, spinner};
use super::state::WizardState;
use crate::error::Result;
use crate::verify::{verify_url, VerifyPolicy};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub struct VerificationStep {
    context: Arc<WizardContext>,
}

impl VerificationStep {
    pub fn new(context: Arc<WizardContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl WizardStep for VerificationStep {
    fn name(&self) -> &'static str {
        "Verify deployment"
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        display_step_header(6, self.name(), "Probe the service URL until it responds.");

        let Some(deployment) = state.deployment() else {
            print_warning("No deployment result was captured. Skipping verification.");
            return Ok(state);
        };
        if !deployment.ok() {
            print_warning("Deployment did not succeed; skipping URL verification.");
            return Ok(state);
        }
        let Some(url) = deployment.url() else {
            print_warning(
                "No URL was returned by deploy step. Verify manually in provider dashboard.",
            );
            return Ok(state);
        };

        let policy = VerifyPolicy::from(&self.context.config.verify);
        info!(
            "Verifying {} ({} attempts, worst case {} s)",
            url,
            policy.attempts,
            policy.worst_case().as_secs()
        );
        let progress = spinner(&format!("Checking {} ...", url));
        let result = verify_url(&self.context.http, url, policy).await;
        progress.finish_and_clear();

        if result.ok {
            print_success(&format!("OpenClaw is live at {}", url));
        } else {
            let status = result
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no status".to_string());
            print_warning(&format!(
                "URL probe did not succeed ({}). You may need to wait longer.",
                status
            ));
        }

        Ok(state)
    }
}
