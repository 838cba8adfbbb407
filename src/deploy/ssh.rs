//! SSH command execution for VPS deployments
//!
//! libssh2 is blocking, so each session runs on tokio's blocking pool and is
//! awaited to completion by the caller.

use async_trait::async_trait;
use log::debug;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use ssh2::Session;
use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How to authenticate the SSH session
#[derive(Clone)]
pub enum SshAuth {
    Password(SecretString),
    PrivateKey(PathBuf),
}

/// Connection details for one SSH session
#[derive(Clone)]
pub struct SshTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: SshAuth,
}

/// Captured output of a remote command
#[derive(Debug, Clone, Serialize)]
pub struct RemoteOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Why a remote command could not be run
#[derive(Debug, Error)]
pub enum SshFailure {
    #[error("{0}")]
    Connect(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Exec(String),
}

/// Runs a shell command on a remote host
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(&self, target: &SshTarget, command: &str) -> Result<RemoteOutput, SshFailure>;
}

/// `RemoteExecutor` backed by libssh2
#[derive(Debug, Clone)]
pub struct Ssh2Executor {
    ready_timeout: Duration,
}

impl Ssh2Executor {
    /// `ready_timeout` bounds the TCP connect, handshake and authentication
    pub fn new(ready_timeout: Duration) -> Self {
        Self { ready_timeout }
    }
}

#[async_trait]
impl RemoteExecutor for Ssh2Executor {
    async fn execute(&self, target: &SshTarget, command: &str) -> Result<RemoteOutput, SshFailure> {
        let target = target.clone();
        let command = command.to_string();
        let ready_timeout = self.ready_timeout;

        tokio::task::spawn_blocking(move || run_session(&target, &command, ready_timeout))
            .await
            .map_err(|e| SshFailure::Exec(format!("SSH worker failed: {}", e)))?
    }
}

fn run_session(
    target: &SshTarget,
    command: &str,
    ready_timeout: Duration,
) -> Result<RemoteOutput, SshFailure> {
    let addr = (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(connect_err)?
        .next()
        .ok_or_else(|| SshFailure::Connect(format!("could not resolve {}", target.host)))?;

    debug!("Connecting to {}:{} as {}", target.host, target.port, target.username);
    let tcp = TcpStream::connect_timeout(&addr, ready_timeout).map_err(connect_err)?;
    let mut session = Session::new().map_err(connect_err)?;
    session.set_timeout(u32::try_from(ready_timeout.as_millis()).unwrap_or(u32::MAX));
    session.set_tcp_stream(tcp);
    session.handshake().map_err(connect_err)?;

    match &target.auth {
        SshAuth::Password(password) => {
            session.userauth_password(&target.username, password.expose_secret())
        }
        SshAuth::PrivateKey(path) => {
            if !path.is_file() {
                return Err(SshFailure::Auth(format!(
                    "private key {} not found",
                    path.display()
                )));
            }
            session.userauth_pubkey_file(&target.username, None, path, None)
        }
    }
    .map_err(|e| SshFailure::Auth(e.to_string()))?;

    if !session.authenticated() {
        return Err(SshFailure::Auth("server rejected the credentials".to_string()));
    }

    // The setup script may legitimately run for minutes.
    session.set_timeout(0);
    let mut channel = session.channel_session().map_err(exec_err)?;
    channel.exec(command).map_err(exec_err)?;

    // Read stdout and stderr interleaved so neither stream can stall the other.
    session.set_blocking(false);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    loop {
        let mut progressed = drain(&mut channel, &mut stdout).map_err(exec_err)?;
        progressed |= drain(&mut channel.stderr(), &mut stderr).map_err(exec_err)?;
        if channel.eof() {
            break;
        }
        if !progressed {
            std::thread::sleep(Duration::from_millis(50));
        }
    }
    session.set_blocking(true);
    channel.read_to_end(&mut stdout).map_err(exec_err)?;
    channel.stderr().read_to_end(&mut stderr).map_err(exec_err)?;

    channel.wait_close().map_err(exec_err)?;
    let code = channel.exit_status().map_err(exec_err)?;
    debug!("Remote command on {} exited with {}", target.host, code);

    Ok(RemoteOutput {
        code: Some(code),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

fn connect_err(e: impl std::fmt::Display) -> SshFailure {
    SshFailure::Connect(e.to_string())
}

fn exec_err(e: impl std::fmt::Display) -> SshFailure {
    SshFailure::Exec(e.to_string())
}

/// Read everything currently available; `Ok(true)` if any bytes arrived
fn drain<R: Read>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<bool> {
    let mut chunk = [0u8; 8192];
    let mut progressed = false;
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(progressed),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                progressed = true;
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(progressed),
            Err(e) => return Err(e),
        }
    }
}
