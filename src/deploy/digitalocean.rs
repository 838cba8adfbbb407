//! DigitalOcean backend: requests a new Droplet
//!
//! Success means the creation request was accepted. The Droplet is not polled
//! until it is running, so no URL is reported.

use super::client::CloudApiClient;
use super::types::{DeploymentResult, Platform};
use log::warn;
use schemars::JsonSchema;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_REGION: &str = "nyc3";
pub const DEFAULT_SIZE: &str = "s-1vcpu-1gb";
pub const DEFAULT_IMAGE: &str = "ubuntu-24-04-x64";
const DROPLET_TAG: &str = "openclaw-easy-deploy";

/// SSH key reference accepted by the Droplet API: numeric id or fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SshKeyRef {
    Id(u64),
    Fingerprint(String),
}

/// Parameters for a Droplet creation request
pub struct DropletRequest {
    pub api_token: SecretString,
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    pub ssh_keys: Vec<SshKeyRef>,
    /// Cloud-init boot script
    pub user_data: Option<String>,
}

#[derive(Serialize)]
struct CreateDropletBody<'a> {
    name: &'a str,
    region: &'a str,
    size: &'a str,
    image: &'a str,
    ssh_keys: &'a [SshKeyRef],
    #[serde(skip_serializing_if = "Option::is_none")]
    user_data: Option<&'a str>,
    tags: [&'static str; 1],
}

pub async fn deploy_digitalocean(
    client: &CloudApiClient,
    request: DropletRequest,
) -> DeploymentResult {
    let body = CreateDropletBody {
        name: &request.name,
        region: &request.region,
        size: &request.size,
        image: &request.image,
        ssh_keys: &request.ssh_keys,
        user_data: request.user_data.as_deref(),
        tags: [DROPLET_TAG],
    };

    let url = format!("{}/v2/droplets", client.endpoints().digitalocean_api);
    let reply = match client.post_json(&url, &request.api_token, &body).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("DigitalOcean API request failed: {}", e);
            return DeploymentResult::failed(
                Platform::DigitalOcean,
                format!("DigitalOcean deployment request failed: {}", e),
            );
        }
    };

    if !reply.is_success() {
        return DeploymentResult::failed(
            Platform::DigitalOcean,
            format!(
                "DigitalOcean deployment failed with status {}.",
                reply.status.as_u16()
            ),
        )
        .with_raw(reply.body);
    }

    let name = reply
        .body
        .pointer("/droplet/name")
        .and_then(Value::as_str)
        .unwrap_or(&request.name)
        .to_string();

    DeploymentResult::succeeded(
        Platform::DigitalOcean,
        format!("Droplet {} creation requested.", name),
        None,
    )
    .with_raw(reply.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let keys = vec![SshKeyRef::Id(512190), SshKeyRef::Fingerprint("3b:16:bf".to_string())];
        let body = CreateDropletBody {
            name: "openclaw-1",
            region: DEFAULT_REGION,
            size: DEFAULT_SIZE,
            image: DEFAULT_IMAGE,
            ssh_keys: &keys,
            user_data: None,
            tags: [DROPLET_TAG],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["ssh_keys"], json!([512190, "3b:16:bf"]));
        assert_eq!(value["tags"], json!(["openclaw-easy-deploy"]));
        assert!(value.get("user_data").is_none());
    }

    #[test]
    fn test_ssh_key_ref_accepts_numbers_and_strings() {
        let keys: Vec<SshKeyRef> = serde_json::from_value(json!([1, "aa:bb"])).unwrap();
        assert_eq!(keys, vec![SshKeyRef::Id(1), SshKeyRef::Fingerprint("aa:bb".to_string())]);
    }
}
