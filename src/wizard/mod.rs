//! Interactive deployment wizard
//!
//! Six fixed steps share one [`WizardState`]: environment checks, platform
//! selection, provider/key setup, config generation, deployment and
//! verification.

mod config_generation;
mod deployment;
mod environment_check;
mod orchestrator;
mod platform_selection;
pub mod prompt;
mod provider_setup;
mod render;
mod state;
mod verification;

pub use config_generation::{generate_password, ConfigGenerationStep};
pub use deployment::{DeployPlan, DeploymentStep};
pub use environment_check::EnvironmentCheckStep;
pub use orchestrator::{
    default_steps, run_wizard, FnStep, Wizard, WizardContext, WizardStep,
};
pub use platform_selection::PlatformSelectionStep;
pub use prompt::{Answer, InquirePrompter, Prompter, ScriptedPrompter};
pub use provider_setup::ProviderSetupStep;
pub use render::{display_step_header, status_indicator, wizard_render_config};
pub use state::WizardState;
pub use verification::VerificationStep;
