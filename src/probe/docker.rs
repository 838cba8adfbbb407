use crate::common::run_captured;
use log::debug;
use serde::Serialize;

/// Result of the Docker engine check
#[derive(Debug, Clone, Serialize)]
pub struct DockerCheck {
    pub ok: bool,
    pub installed: bool,
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

impl DockerCheck {
    /// Build the check result from the two probe outcomes
    pub fn from_probes(installed: bool, running: bool) -> Self {
        let guidance = if !installed {
            Some(
                "Docker is not installed or not available in PATH. Install Docker Desktop: https://docs.docker.com/get-docker/"
                    .to_string(),
            )
        } else if !running {
            Some(
                "Docker is installed but not running. Start Docker Desktop and rerun the wizard."
                    .to_string(),
            )
        } else {
            None
        };

        Self {
            ok: installed && running,
            installed,
            running: installed && running,
            guidance,
        }
    }
}

/// Check that the `docker` CLI exists and the engine answers `docker info`
pub async fn check_docker() -> DockerCheck {
    if let Err(e) = run_captured("docker", &["--version"], None).await {
        debug!("docker is not available: {}", e);
        return DockerCheck::from_probes(false, false);
    }

    let running = match run_captured("docker", &["info"], None).await {
        Ok(output) => output.success(),
        Err(e) => {
            debug!("docker info failed to start: {}", e);
            false
        }
    };

    DockerCheck::from_probes(true, running)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_installed() {
        let check = DockerCheck::from_probes(false, false);
        assert!(!check.ok);
        assert!(!check.installed);
        assert!(check.guidance.unwrap().contains("not installed"));
    }

    #[test]
    fn test_installed_not_running() {
        let check = DockerCheck::from_probes(true, false);
        assert!(!check.ok);
        assert!(check.installed);
        assert!(check.guidance.unwrap().contains("not running"));
    }

    #[test]
    fn test_healthy() {
        let check = DockerCheck::from_probes(true, true);
        assert!(check.ok);
        assert!(check.running);
        assert!(check.guidance.is_none());
    }
}
