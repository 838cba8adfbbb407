//! Read-only platform metadata resource

use super::protocol::{ResourceContents, ResourceDescriptor};
use crate::deploy::Platform;
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

pub const PLATFORMS_URI: &str = "openclaw://platforms";

/// Pricing, limits and docs notes for one platform
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlatformInfo {
    pub pricing: &'static str,
    pub limits: &'static str,
    pub docs: &'static str,
}

pub fn platform_info(platform: Platform) -> PlatformInfo {
    match platform {
        Platform::Render => PlatformInfo {
            pricing: "Free tier available, paid plans for production workloads.",
            limits: "Blueprint/API quotas apply per account.",
            docs: "https://render.com/docs",
        },
        Platform::DigitalOcean => PlatformInfo {
            pricing: "Starts around $6/month for basic Droplets.",
            limits: "Droplet quotas vary by account region and history.",
            docs: "https://docs.digitalocean.com/products/droplets/",
        },
        Platform::Vps => PlatformInfo {
            pricing: "Depends on provider (Hetzner, Vultr, AWS, etc.).",
            limits: "No platform abstraction, full infra responsibility.",
            docs: "https://www.digitalocean.com/community/tutorials/how-to-run-openclaw",
        },
        Platform::Local => PlatformInfo {
            pricing: "No cloud cost; local machine resources only.",
            limits: "Requires always-on local host and open ports.",
            docs: "https://docs.docker.com/engine/install/",
        },
    }
}

pub fn list_resources() -> Vec<ResourceDescriptor> {
    vec![ResourceDescriptor {
        uri: PLATFORMS_URI,
        name: "platform-metadata",
        description: "Pricing, limits and documentation links for each deployment platform",
        mime_type: "application/json",
    }]
}

/// Contents of `uri`, or `None` for an unknown resource
pub fn read_resource(uri: &str) -> Result<Option<ResourceContents>> {
    if uri != PLATFORMS_URI {
        return Ok(None);
    }

    let metadata: BTreeMap<&str, PlatformInfo> = Platform::ALL
        .into_iter()
        .map(|p| (p.as_str(), platform_info(p)))
        .collect();

    Ok(Some(ResourceContents {
        uri: PLATFORMS_URI,
        mime_type: "application/json",
        text: serde_json::to_string_pretty(&metadata)?,
    }))
}
