use serde::Serialize;
use std::path::Path;
use tokio::process::Command;

/// Captured result of a finished process
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run a command to completion and capture its output
///
/// Spawn failures (missing binary, bad working directory) are returned as
/// `Err`; a non-zero exit is a normal `Ok` result.
pub async fn run_captured(
    cmd: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> std::io::Result<CommandOutput> {
    let mut command = Command::new(cmd);
    command.args(args).kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().await?;
    Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let result = run_captured("openclaw-definitely-missing-binary", &["--version"], None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_spawn_error() {
        let result = run_captured(
            "openclaw-definitely-missing-binary",
            &[],
            Some(Path::new("/definitely/not/a/dir")),
        )
        .await;
        assert!(result.is_err());
    }
}
