//! # OpenClaw Easy Deploy
//!
//! An interactive deployment helper for OpenClaw. The wizard checks local
//! prerequisites, validates an LLM provider key, renders `.env`,
//! `docker-compose.yml` and (for Render) `render.yaml`, deploys to one of four
//! targets and then polls the service until it answers.
//!
//! The same operations are available to programs as MCP tools over stdio.
//!
//! ## Example
//!
//! ```rust,no_run
//! use openclaw_deploy::{config, run, Mode};
//!
//! # async fn example() -> openclaw_deploy::Result<()> {
//! let config = config::load_config(None)?;
//! run(Mode::Wizard, &config).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod deploy;
pub mod error;
pub mod generator;
pub mod llm;
pub mod mcp;
pub mod probe;
pub mod verify;
pub mod wizard;

pub use config::AppConfig;
pub use deploy::{DeploymentResult, Platform};
pub use error::{DeployError, Result};
pub use generator::{generate_config, GeneratedConfig};
pub use llm::LlmProvider;
pub use wizard::{run_wizard, WizardState};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the binary was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interactive terminal wizard
    Wizard,
    /// MCP tool server over stdio
    Mcp,
}

pub async fn run(mode: Mode, config: &AppConfig) -> Result<()> {
    match mode {
        Mode::Wizard => run_wizard(config).await.map(|_| ()),
        Mode::Mcp => mcp::serve_stdio(config).await,
    }
}
