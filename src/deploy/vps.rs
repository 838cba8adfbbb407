//! Custom VPS backend: runs a setup script over one SSH session

use super::ssh::{RemoteExecutor, SshAuth, SshFailure, SshTarget};
use super::types::{DeploymentResult, Platform};
use crate::error::{DeployError, Result};
use log::warn;
use secrecy::SecretString;
use std::path::PathBuf;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// Script run on the host when the caller does not supply one
pub const DEFAULT_SETUP_SCRIPT: &str = "set -euo pipefail
if ! command -v docker >/dev/null 2>&1; then echo \"Docker is required\"; exit 1; fi
docker compose pull
docker compose up -d";

/// Parameters for a VPS deployment
pub struct VpsDeployRequest {
    pub target: SshTarget,
    pub setup_script: String,
    /// Port OpenClaw listens on, used to build the service URL
    pub app_port: u16,
}

impl SshAuth {
    /// Pick the auth method from optional inputs; exactly one must be given
    pub fn from_options(
        password: Option<SecretString>,
        private_key_path: Option<PathBuf>,
    ) -> Result<Self> {
        match (password, private_key_path) {
            (Some(password), None) => Ok(SshAuth::Password(password)),
            (None, Some(path)) => Ok(SshAuth::PrivateKey(path)),
            (None, None) => Err(DeployError::Precondition(
                "Either password or privateKeyPath is required for SSH auth.".to_string(),
            )),
            (Some(_), Some(_)) => Err(DeployError::validation(
                "password",
                "provide either password or privateKeyPath, not both",
            )),
        }
    }
}

pub async fn deploy_vps(
    executor: &dyn RemoteExecutor,
    request: VpsDeployRequest,
) -> DeploymentResult {
    let host = request.target.host.clone();

    match executor.execute(&request.target, &request.setup_script).await {
        Ok(output) if output.code == Some(0) => DeploymentResult::succeeded(
            Platform::Vps,
            "VPS deployment script completed successfully.",
            Some(format!("http://{}:{}", host, request.app_port)),
        )
        .with_raw(output),
        Ok(output) => {
            let code = output
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            DeploymentResult::failed(
                Platform::Vps,
                format!("VPS deployment script failed (exit code {}).", code),
            )
            .with_raw(output)
        }
        Err(failure) => {
            warn!("SSH deployment to {} failed: {}", host, failure);
            let message = match failure {
                SshFailure::Connect(e) => format!("SSH connection failed: {}", e),
                SshFailure::Auth(e) => format!("SSH authentication failed: {}", e),
                SshFailure::Exec(e) => format!("SSH command execution failed: {}", e),
            };
            DeploymentResult::failed(Platform::Vps, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::ssh::RemoteOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeExecutor {
        outcome: fn() -> std::result::Result<RemoteOutput, SshFailure>,
        commands: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RemoteExecutor for FakeExecutor {
        async fn execute(
            &self,
            _target: &SshTarget,
            command: &str,
        ) -> std::result::Result<RemoteOutput, SshFailure> {
            self.commands.lock().unwrap().push(command.to_string());
            (self.outcome)()
        }
    }

    fn request() -> VpsDeployRequest {
        VpsDeployRequest {
            target: SshTarget {
                host: "203.0.113.10".to_string(),
                port: DEFAULT_SSH_PORT,
                username: "root".to_string(),
                auth: SshAuth::Password(SecretString::from("hunter22".to_string())),
            },
            setup_script: DEFAULT_SETUP_SCRIPT.to_string(),
            app_port: 3000,
        }
    }

    #[tokio::test]
    async fn test_zero_exit_reports_url() {
        let executor = FakeExecutor {
            outcome: || {
                Ok(RemoteOutput {
                    code: Some(0),
                    stdout: "up".into(),
                    stderr: String::new(),
                })
            },
            commands: Mutex::new(Vec::new()),
        };
        let result = deploy_vps(&executor, request()).await;
        assert!(result.ok());
        assert_eq!(result.url(), Some("http://203.0.113.10:3000"));
        assert_eq!(executor.commands.lock().unwrap().as_slice(), [DEFAULT_SETUP_SCRIPT]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_script_failure() {
        let executor = FakeExecutor {
            outcome: || {
                Ok(RemoteOutput {
                    code: Some(1),
                    stdout: "Docker is required".into(),
                    stderr: String::new(),
                })
            },
            commands: Mutex::new(Vec::new()),
        };
        let result = deploy_vps(&executor, request()).await;
        assert!(!result.ok());
        assert!(result.url().is_none());
        assert_eq!(result.message(), "VPS deployment script failed (exit code 1).");
        assert_eq!(result.raw().unwrap()["stdout"], "Docker is required");
    }

    #[tokio::test]
    async fn test_connection_and_auth_failures_are_distinguished() {
        let executor = FakeExecutor {
            outcome: || Err(SshFailure::Connect("connection refused".into())),
            commands: Mutex::new(Vec::new()),
        };
        let result = deploy_vps(&executor, request()).await;
        assert_eq!(result.message(), "SSH connection failed: connection refused");

        let executor = FakeExecutor {
            outcome: || Err(SshFailure::Auth("bad password".into())),
            commands: Mutex::new(Vec::new()),
        };
        let result = deploy_vps(&executor, request()).await;
        assert_eq!(result.message(), "SSH authentication failed: bad password");
    }

    #[test]
    fn test_auth_requires_exactly_one_method() {
        assert!(matches!(
            SshAuth::from_options(None, None),
            Err(DeployError::Precondition(_))
        ));
        assert!(matches!(
            SshAuth::from_options(
                Some(SecretString::from("pw".to_string())),
                Some(PathBuf::from("/k"))
            ),
            Err(DeployError::Validation { .. })
        ));
        assert!(matches!(
            SshAuth::from_options(None, Some(PathBuf::from("/k"))),
            Ok(SshAuth::PrivateKey(_))
        ));
    }
}
