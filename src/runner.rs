//! Child process execution for install/uninstall and sgpt invocations.
//!
//! Commands are shell strings run through `sh -c`, passed through to the
//! terminal so interactive prompts (pip, the sgpt API-key prompt) keep
//! working. Any non-zero exit is fatal to the whole run.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SetupError};
use crate::user::RealUser;

/// How a shell command should be run.
#[derive(Debug, Default)]
pub struct RunConfig {
    /// Prepend `sudo` to the command line.
    pub sudo: bool,
    /// Text piped to the child's stdin.
    pub input: Option<String>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    #[allow(dead_code)]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// Run a shell command with stdio passed through to the terminal.
///
/// Non-zero exit is an error carrying the full command line.
pub async fn run_shell(command: &str, config: RunConfig) -> Result<()> {
    let line = if config.sudo {
        format!("sudo {command}")
    } else {
        command.to_string()
    };
    debug!(command = %line, "running shell command");

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(&line);
    if config.input.is_some() {
        cmd.stdin(Stdio::piped());
    }

    let mut child = cmd.spawn()?;
    if let Some(text) = config.input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // dropping stdin closes the pipe so the child sees EOF
        }
    }

    let status = child.wait().await?;
    if !status.success() {
        return Err(SetupError::CommandFailed {
            command: line,
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

/// Run a shell command and return its captured stdout.
pub async fn capture_shell(command: &str) -> Result<String> {
    debug!(command, "capturing shell command");

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(SetupError::CommandFailed {
            command: command.to_string(),
            code: output.status.code().unwrap_or(-1),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run `sgpt` with the given argument string as the real invoking user.
///
/// Under sudo the sub-invocation is re-targeted at the original user with an
/// explicit `PATH` and `HOME`, so it resolves the same `.sgptrc` a
/// non-elevated run would.
pub async fn run_sgpt(user: &RealUser, args: &str) -> Result<()> {
    let sgpt = which::which("sgpt")?;
    let command = match &user.name {
        Some(name) => format!(
            "sudo -u {} env PATH=\"{}\" HOME=\"{}\" {} {}",
            name,
            std::env::var("PATH").unwrap_or_default(),
            user.home.display(),
            sgpt.display(),
            args
        ),
        None => format!("{} {}", sgpt.display(), args),
    };
    run_shell(&command, RunConfig::new()).await
}
