//! Local prerequisite probes
//!
//! OpenClaw needs a recent Node.js runtime and a running Docker engine. The
//! probes never fail: every outcome, including a missing binary, is reported
//! as a check result with guidance text.

pub mod docker;
pub mod node;

pub use docker::{check_docker, DockerCheck};
pub use node::{check_node, parse_node_major, NodeCheck, DEFAULT_MIN_NODE_MAJOR};

use async_trait::async_trait;
use serde::Serialize;

/// Pass/fail result of a single check, with an optional HTTP status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn status(ok: bool, status: u16) -> Self {
        Self {
            ok,
            status: Some(status),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            error: Some(message.into()),
        }
    }
}

/// Combined result of the environment checks
#[derive(Debug, Clone, Serialize)]
pub struct PrereqReport {
    pub node: NodeCheck,
    pub docker: DockerCheck,
}

impl PrereqReport {
    pub fn all_ok(&self) -> bool {
        self.node.ok && self.docker.ok
    }
}

/// Source of prerequisite reports
#[async_trait]
pub trait PrereqProbe: Send + Sync {
    async fn check(&self, min_node_major: u32) -> PrereqReport;
}

/// Probes the real toolchain on this machine
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

#[async_trait]
impl PrereqProbe for SystemProbe {
    async fn check(&self, min_node_major: u32) -> PrereqReport {
        let node = check_node(min_node_major).await;
        let docker = check_docker().await;
        PrereqReport { node, docker }
    }
}
