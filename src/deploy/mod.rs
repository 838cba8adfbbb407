//! Deployment backends
//!
//! Every backend takes its own request record and returns a
//! [`DeploymentResult`]. Expected failures (non-2xx responses, failed scripts,
//! unreachable hosts) are always reported through the result, never as errors.
//! [`Deployer`] is the single dispatch point from a [`DeployTarget`] to the
//! matching backend.

pub mod client;
pub mod digitalocean;
pub mod local;
pub mod render;
pub mod ssh;
pub mod types;
pub mod vps;

pub use client::CloudApiClient;
pub use digitalocean::{deploy_digitalocean, DropletRequest, SshKeyRef};
pub use local::{deploy_local, LocalDeployRequest};
pub use render::{deploy_render, RenderDeployRequest};
pub use ssh::{RemoteExecutor, Ssh2Executor, SshAuth, SshTarget};
pub use types::{DeploymentResult, Platform};
pub use vps::{deploy_vps, VpsDeployRequest};

use crate::config::AppConfig;
use crate::error::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// A fully-specified deployment for one platform
pub enum DeployTarget {
    Render(RenderDeployRequest),
    DigitalOcean(DropletRequest),
    Vps(VpsDeployRequest),
    Local(LocalDeployRequest),
}

impl DeployTarget {
    pub fn platform(&self) -> Platform {
        match self {
            DeployTarget::Render(_) => Platform::Render,
            DeployTarget::DigitalOcean(_) => Platform::DigitalOcean,
            DeployTarget::Vps(_) => Platform::Vps,
            DeployTarget::Local(_) => Platform::Local,
        }
    }
}

/// Anything that can carry out a deployment and report on it
#[async_trait]
pub trait DeploymentBackend: Send + Sync {
    async fn deploy(&self, target: DeployTarget) -> DeploymentResult;
}

/// Dispatches to the real backends
pub struct Deployer {
    client: CloudApiClient,
    ssh: Arc<dyn RemoteExecutor>,
}

impl Deployer {
    pub fn new(client: CloudApiClient, ssh: Arc<dyn RemoteExecutor>) -> Self {
        Self { client, ssh }
    }

    /// Build a deployer from configuration, using libssh2 for VPS targets
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = CloudApiClient::new(config.endpoints.clone(), config.timeouts.provider_api())?;
        let ssh = Arc::new(Ssh2Executor::new(config.timeouts.ssh_ready()));
        Ok(Self::new(client, ssh))
    }
}

#[async_trait]
impl DeploymentBackend for Deployer {
    async fn deploy(&self, target: DeployTarget) -> DeploymentResult {
        let platform = target.platform();
        info!("Deploying to {}", platform);

        let result = match target {
            DeployTarget::Render(request) => deploy_render(&self.client, request).await,
            DeployTarget::DigitalOcean(request) => deploy_digitalocean(&self.client, request).await,
            DeployTarget::Vps(request) => deploy_vps(self.ssh.as_ref(), request).await,
            DeployTarget::Local(request) => deploy_local(request).await,
        };

        info!("Deployment to {} finished: ok={}", platform, result.ok());
        result
    }
}
