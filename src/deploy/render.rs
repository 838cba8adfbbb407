//! Render backend: submits a `render.yaml` blueprint to the deploy API

use super::client::CloudApiClient;
use super::types::{DeploymentResult, Platform};
use log::{info, warn};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Parameters for a Render deployment
pub struct RenderDeployRequest {
    pub api_token: SecretString,
    pub blueprint_path: PathBuf,
    /// Only confirm the blueprint is readable; make no network call
    pub dry_run: bool,
}

pub async fn deploy_render(
    client: &CloudApiClient,
    request: RenderDeployRequest,
) -> DeploymentResult {
    let blueprint = match tokio::fs::read_to_string(&request.blueprint_path).await {
        Ok(body) => body,
        Err(e) => {
            return DeploymentResult::failed(
                Platform::Render,
                format!(
                    "Could not read Render blueprint at {}: {}",
                    request.blueprint_path.display(),
                    e
                ),
            );
        }
    };

    if request.dry_run {
        info!("Render dry run: blueprint {} is readable", request.blueprint_path.display());
        return DeploymentResult::succeeded(
            Platform::Render,
            "Render deployment dry-run completed. Blueprint read successfully.",
            None,
        )
        .with_raw(json!({ "blueprintPreviewLength": blueprint.len() }));
    }

    let url = format!("{}/v1/blueprints/deploys", client.endpoints().render_api);
    let reply = match client
        .post_json(&url, &request.api_token, &json!({ "blueprint": blueprint }))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Render API request failed: {}", e);
            return DeploymentResult::failed(
                Platform::Render,
                format!("Render deployment request failed: {}", e),
            );
        }
    };

    if !reply.is_success() {
        return DeploymentResult::failed(
            Platform::Render,
            format!(
                "Render deployment failed with status {}.",
                reply.status.as_u16()
            ),
        )
        .with_raw(reply.body);
    }

    let service_url = extract_service_url(&reply.body);
    DeploymentResult::succeeded(
        Platform::Render,
        "Render deployment triggered successfully.",
        service_url,
    )
    .with_raw(reply.body)
}

/// Dashboard URL, falling back to the service URL
fn extract_service_url(body: &Value) -> Option<String> {
    body.get("dashboardUrl")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/service/serviceDetails/url").and_then(Value::as_str))
        .map(str::to_string)
}
