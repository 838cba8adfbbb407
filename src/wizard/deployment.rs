//! Step 5: deploy to the selected platform
//!
//! Each platform has its own question flow that ends in a [`DeployPlan`]. The
//! plan is then handed to the backend; this is the only place the wizard
//! branches on the platform.

use super::orchestrator::{WizardContext, WizardStep};
use super::prompt::{ask_secret, validate_non_empty, validate_port};
use super::render::{display_step_header, spinner};
use super::state::WizardState;
use crate::common::expand_home;
use crate::deploy::digitalocean::{DEFAULT_IMAGE, DEFAULT_REGION, DEFAULT_SIZE};
use crate::deploy::vps::{DEFAULT_SETUP_SCRIPT, DEFAULT_SSH_PORT};
use crate::deploy::{
    DeployTarget, DeploymentResult, DropletRequest, LocalDeployRequest, Platform,
    RenderDeployRequest, SshAuth, SshTarget, VpsDeployRequest,
};
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use colored::Colorize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const MIN_TOKEN_LENGTH: usize = 10;
const DEFAULT_KEY_PATH: &str = "~/.ssh/id_rsa";

/// What the deployment step will do once all questions are answered
pub enum DeployPlan {
    Execute(DeployTarget),
    /// Nothing to run; the result is already known
    Skip(DeploymentResult),
}

pub struct DeploymentStep {
    context: Arc<WizardContext>,
}

impl DeploymentStep {
    pub fn new(context: Arc<WizardContext>) -> Self {
        Self { context }
    }

    /// Ask the platform-specific questions and build the plan
    pub fn plan(&self, state: &WizardState) -> Result<DeployPlan> {
        let platform = state.platform().ok_or_else(|| {
            DeployError::Precondition("Platform must be selected before deployment.".to_string())
        })?;
        let app_port = state
            .app_port()
            .unwrap_or(self.context.config.defaults.app_port);

        match platform {
            Platform::Local => Ok(DeployPlan::Execute(DeployTarget::Local(LocalDeployRequest {
                output_dir: state.output_dir().to_path_buf(),
                app_port,
            }))),
            Platform::Render => self.plan_render(state),
            Platform::DigitalOcean => self.plan_digitalocean(),
            Platform::Vps => self.plan_vps(app_port),
        }
    }

    fn plan_render(&self, state: &WizardState) -> Result<DeployPlan> {
        let blueprint_path = state
            .generated()
            .and_then(|g| g.blueprint_path.clone())
            .ok_or_else(|| {
                DeployError::Precondition(
                    "render.yaml is missing. Regenerate config with Render platform selected."
                        .to_string(),
                )
            })?;

        let prompter = self.context.prompter.as_ref();
        let api_token = ask_secret(
            prompter,
            "Render API token:",
            MIN_TOKEN_LENGTH,
            "Render token is required.",
        )?;
        let live = prompter.confirm("Trigger a live Render deployment now?", false)?;

        Ok(DeployPlan::Execute(DeployTarget::Render(RenderDeployRequest {
            api_token,
            blueprint_path,
            dry_run: !live,
        })))
    }

    fn plan_digitalocean(&self) -> Result<DeployPlan> {
        let prompter = self.context.prompter.as_ref();
        let api_token = ask_secret(
            prompter,
            "DigitalOcean API token:",
            MIN_TOKEN_LENGTH,
            "DigitalOcean API token is required.",
        )?;
        let default_name = default_droplet_name();
        let name = prompter.text(
            "Droplet name:",
            Some(default_name.as_str()),
            Some(validate_non_empty),
        )?;
        let region = prompter.text("Region slug:", Some(DEFAULT_REGION), Some(validate_non_empty))?;
        let size = prompter.text("Size slug:", Some(DEFAULT_SIZE), Some(validate_non_empty))?;
        let image = prompter.text("Image slug:", Some(DEFAULT_IMAGE), Some(validate_non_empty))?;

        if !prompter.confirm("Create the Droplet now?", false)? {
            return Ok(DeployPlan::Skip(DeploymentResult::succeeded(
                Platform::DigitalOcean,
                "Skipped live DigitalOcean deploy (dry run).",
                None,
            )));
        }

        Ok(DeployPlan::Execute(DeployTarget::DigitalOcean(DropletRequest {
            api_token,
            name: name.trim().to_string(),
            region: region.trim().to_string(),
            size: size.trim().to_string(),
            image: image.trim().to_string(),
            ssh_keys: Vec::new(),
            user_data: None,
        })))
    }

    fn plan_vps(&self, app_port: u16) -> Result<DeployPlan> {
        let prompter = self.context.prompter.as_ref();
        let host = prompter.text("VPS host/IP:", None, Some(validate_non_empty))?;
        let port = prompter
            .text("SSH port:", Some(DEFAULT_SSH_PORT.to_string().as_str()), Some(validate_port))?
            .trim()
            .parse::<u16>()
            .map_err(|e| DeployError::validation("port", e.to_string()))?;
        let username = prompter.text("SSH username:", Some("root"), Some(validate_non_empty))?;

        let methods = vec!["Password".to_string(), "Private key path".to_string()];
        let auth = match prompter.select("SSH authentication method:", &methods)? {
            0 => SshAuth::Password(ask_secret(
                prompter,
                "SSH password:",
                1,
                "Password is required.",
            )?),
            _ => {
                let path = prompter.text(
                    "Path to private key file:",
                    Some(DEFAULT_KEY_PATH),
                    Some(validate_non_empty),
                )?;
                SshAuth::PrivateKey(expand_home(path.trim()))
            }
        };

        Ok(DeployPlan::Execute(DeployTarget::Vps(VpsDeployRequest {
            target: SshTarget {
                host: host.trim().to_string(),
                port,
                username: username.trim().to_string(),
                auth,
            },
            setup_script: DEFAULT_SETUP_SCRIPT.to_string(),
            app_port,
        })))
    }
}

fn default_droplet_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("openclaw-{}", millis)
}

#[async_trait]
impl WizardStep for DeploymentStep {
    fn name(&self) -> &'static str {
        "Deploy"
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        display_step_header(5, self.name(), "Ship OpenClaw to the selected platform.");

        let deployment = match self.plan(&state)? {
            DeployPlan::Skip(result) => result,
            DeployPlan::Execute(target) => {
                let progress = spinner("Deploying OpenClaw...");
                let result = self.context.backend.deploy(target).await;
                progress.finish_and_clear();
                result
            }
        };

        if deployment.ok() {
            println!("{} {}", "✓".green(), deployment.message());
        } else {
            println!("{} {}", "✗".red(), deployment.message().red());
        }
        if let Some(url) = deployment.url() {
            println!("  {} {}", "Deployment URL hint:".dimmed(), url.cyan());
        }

        Ok(state.with_deployment(deployment))
    }
}
