//! Step 1: local prerequisites

use super::orchestrator::{WizardContext, WizardStep};
use super::render::{display_step_header, print_check, print_warning, spinner};
use super::state::WizardState;
use crate::error::{DeployError, Result};
use crate::probe::PrereqReport;
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;

pub struct EnvironmentCheckStep {
    context: Arc<WizardContext>,
}

impl EnvironmentCheckStep {
    pub fn new(context: Arc<WizardContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl WizardStep for EnvironmentCheckStep {
    fn name(&self) -> &'static str {
        "Environment checks"
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        display_step_header(1, self.name(), "Checking Node.js and Docker prerequisites.");

        let progress = spinner("Checking Node.js and Docker...");
        let report = self
            .context
            .probe
            .check(self.context.config.defaults.min_node_major)
            .await;
        progress.finish_and_clear();

        print_report(&report);

        if !report.all_ok() {
            let proceed = self
                .context
                .prompter
                .confirm("One or more prerequisites failed. Continue anyway?", false)?;
            if !proceed {
                return Err(DeployError::UserAborted(
                    "Deployment aborted due to failed prerequisite checks.".to_string(),
                ));
            }
            warn!("Continuing with failed prerequisite checks");
        }

        Ok(state)
    }
}

fn print_report(report: &PrereqReport) {
    let node = &report.node;
    if node.ok {
        print_check(true, "Node.js", &format!("({})", node.found_version));
    } else {
        print_check(
            false,
            "Node.js",
            &format!("found {}, need >= {}", node.found_version, node.minimum_major),
        );
    }
    if let Some(guidance) = &node.guidance {
        print_warning(guidance);
    }

    let docker = &report.docker;
    print_check(
        docker.ok,
        "Docker",
        if docker.ok { "(running)" } else { "check failed" },
    );
    if let Some(guidance) = &docker.guidance {
        print_warning(guidance);
    }
}
