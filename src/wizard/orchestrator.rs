//! Wizard orchestration - runs the steps in order and threads the state through

use super::config_generation::ConfigGenerationStep;
use super::deployment::DeploymentStep;
use super::environment_check::EnvironmentCheckStep;
use super::platform_selection::PlatformSelectionStep;
use super::prompt::{InquirePrompter, Prompter};
use super::provider_setup::ProviderSetupStep;
use super::render::{display_banner, print_success};
use super::state::WizardState;
use super::verification::VerificationStep;
use crate::config::AppConfig;
use crate::deploy::{DeploymentBackend, Deployer};
use crate::error::Result;
use crate::llm::{ApiKeyValidator, HttpKeyValidator};
use crate::probe::{PrereqProbe, SystemProbe};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use std::sync::Arc;

/// One stage of the wizard: consumes the current state and returns the next one
#[async_trait]
pub trait WizardStep: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, state: WizardState) -> Result<WizardState>;
}

/// A step backed by a plain function
pub struct FnStep<F> {
    name: &'static str,
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(WizardState) -> Result<WizardState> + Send + Sync,
{
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

#[async_trait]
impl<F> WizardStep for FnStep<F>
where
    F: Fn(WizardState) -> Result<WizardState> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, state: WizardState) -> Result<WizardState> {
        (self.func)(state)
    }
}

/// Collaborators the built-in steps work with
pub struct WizardContext {
    pub config: AppConfig,
    pub prompter: Arc<dyn Prompter>,
    pub probe: Arc<dyn PrereqProbe>,
    pub validator: Arc<dyn ApiKeyValidator>,
    pub backend: Arc<dyn DeploymentBackend>,
    pub http: Client,
}

impl WizardContext {
    /// Terminal prompts, real probes and real provider APIs
    pub fn interactive(config: AppConfig) -> Result<Self> {
        let validator = Arc::new(HttpKeyValidator::new(config.endpoints.clone())?);
        let backend = Arc::new(Deployer::from_config(&config)?);
        Ok(Self {
            prompter: Arc::new(InquirePrompter),
            probe: Arc::new(SystemProbe),
            validator,
            backend,
            http: Client::builder().build()?,
            config,
        })
    }
}

/// An ordered list of steps
pub struct Wizard {
    steps: Vec<Box<dyn WizardStep>>,
}

impl Wizard {
    pub fn new(steps: Vec<Box<dyn WizardStep>>) -> Self {
        Self { steps }
    }

    /// The six built-in steps, in their fixed order
    pub fn with_default_steps(context: Arc<WizardContext>) -> Self {
        Self::new(default_steps(context))
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order, stopping at the first failure
    ///
    /// Each step starts only after the previous one has returned its state.
    pub async fn run(&self, initial: WizardState) -> Result<WizardState> {
        let total = self.steps.len();
        let mut state = initial;

        for (index, step) in self.steps.iter().enumerate() {
            debug!("Wizard step {}/{}: {}", index + 1, total, step.name());
            state = step.run(state).await.inspect_err(|e| {
                info!("Wizard stopped at step '{}': {}", step.name(), e);
            })?;
        }

        Ok(state)
    }
}

pub fn default_steps(context: Arc<WizardContext>) -> Vec<Box<dyn WizardStep>> {
    vec![
        Box::new(EnvironmentCheckStep::new(context.clone())),
        Box::new(PlatformSelectionStep::new(context.clone())),
        Box::new(ProviderSetupStep::new(context.clone())),
        Box::new(ConfigGenerationStep::new(context.clone())),
        Box::new(DeploymentStep::new(context.clone())),
        Box::new(VerificationStep::new(context)),
    ]
}

/// Run the interactive wizard with `config`
pub async fn run_wizard(config: &AppConfig) -> Result<WizardState> {
    display_banner();

    let context = Arc::new(WizardContext::interactive(config.clone())?);
    let wizard = Wizard::with_default_steps(context);
    let state = wizard.run(WizardState::new(config.output_dir())).await?;

    println!();
    print_success("OpenClaw easy deploy wizard completed.");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::Platform;
    use crate::error::DeployError;

    #[tokio::test]
    async fn test_failure_stops_later_steps() {
        let wizard = Wizard::new(vec![
            Box::new(FnStep::new("platform", |s: WizardState| {
                Ok(s.with_platform(Platform::Vps))
            })),
            Box::new(FnStep::new("broken", |_s: WizardState| {
                Err(DeployError::Precondition("nope".to_string()))
            })),
            Box::new(FnStep::new("unreachable", |_s: WizardState| {
                panic!("must not run after a failed step")
            })),
        ]);

        let err = wizard.run(WizardState::new("/tmp/out")).await.unwrap_err();
        assert!(matches!(err, DeployError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_empty_wizard_returns_initial_state() {
        let state = Wizard::new(Vec::new())
            .run(WizardState::new("/tmp/out"))
            .await
            .unwrap();
        assert_eq!(state.defined_fields(), vec!["outputDir"]);
    }
}
