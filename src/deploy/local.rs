//! Local backend: `docker compose up -d` in the output directory

use super::types::{DeploymentResult, Platform};
use crate::common::{run_captured, CommandOutput};
use log::{info, warn};
use std::path::PathBuf;

/// Parameters for a local Docker Compose deployment
#[derive(Debug, Clone)]
pub struct LocalDeployRequest {
    /// Directory holding the generated `docker-compose.yml`
    pub output_dir: PathBuf,
    pub app_port: u16,
}

pub async fn deploy_local(request: LocalDeployRequest) -> DeploymentResult {
    info!("Running docker compose up -d in {}", request.output_dir.display());
    let output = match run_captured(
        "docker",
        &["compose", "up", "-d"],
        Some(request.output_dir.as_path()),
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            warn!("Could not start docker compose: {}", e);
            CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: e.to_string(),
            }
        }
    };

    if !output.success() {
        return DeploymentResult::failed(Platform::Local, "Local Docker deployment failed.")
            .with_raw(output);
    }

    DeploymentResult::succeeded(
        Platform::Local,
        "Local Docker deployment started.",
        Some(format!("http://localhost:{}", request.app_port)),
    )
    .with_raw(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_directory_is_reported_failure() {
        let result = deploy_local(LocalDeployRequest {
            output_dir: PathBuf::from("/definitely/not/a/dir"),
            app_port: 3000,
        })
        .await;
        assert!(!result.ok());
        assert!(result.url().is_none());
        assert_eq!(result.platform(), Platform::Local);
        assert_eq!(result.raw().unwrap()["code"], 1);
    }
}
