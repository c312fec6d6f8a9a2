// src/exec.rs

//! Command execution port
//!
//! Every call the apt facade makes to an external tool goes through the
//! [`CommandRunner`] trait. [`SystemRunner`] is the real implementation backed
//! by `std::process::Command`; tests substitute a scripted runner.

use crate::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of one external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status (-1 when the process was killed by a signal)
    pub retcode: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.retcode == 0
    }
}

/// Runs external commands on behalf of the facade
pub trait CommandRunner {
    /// Run `argv` to completion, optionally feeding `stdin`, and capture
    /// its exit status and output.
    fn run_all(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput>;

    /// Run `argv` and return only its standard output
    fn run_stdout(&self, argv: &[String]) -> Result<String> {
        Ok(self.run_all(argv, None)?.stdout)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run_all(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        (**self).run_all(argv, stdin)
    }
}

/// Runner that spawns real processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Extra environment applied to every command
    env: Vec<(String, String)>,
}

impl SystemRunner {
    pub fn new(env: Vec<(String, String)>) -> Self {
        Self { env }
    }
}

impl CommandRunner for SystemRunner {
    fn run_all(&self, argv: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::InvocationError("Empty command line".to_string()))?;

        debug!("Running: {}", argv.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    Error::ToolNotFound(format!("{}: {}", program, e))
                }
                _ => Error::IoError(format!("Failed to run {}: {}", program, e)),
            })?;

        if let Some(input) = stdin {
            // Dropping the handle closes the pipe so the child sees EOF
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(input.as_bytes()).map_err(|e| {
                    Error::IoError(format!("Failed to write stdin of {}: {}", program, e))
                })?;
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::IoError(format!("Failed to wait for {}: {}", program, e)))?;

        let result = CommandOutput {
            retcode: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("{} exited with {}", program, result.retcode);
        Ok(result)
    }
}
