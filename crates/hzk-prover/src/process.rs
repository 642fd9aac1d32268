//! # Bounded Subprocess Execution
//!
//! Runs one external tool to completion under a deadline. Output is
//! captured and logged; a non-zero exit becomes [`ProverError::Subprocess`] carrying
//! the tool's stderr verbatim. The child is spawned with `kill_on_drop`, so
//! a timed-out or cancelled run never leaves a process behind.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::ProverError;

/// One external tool invocation.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// Short tool name used in errors and logs.
    pub tool: &'static str,
    pub program: &'a Path,
    pub args: Vec<&'a OsStr>,
    pub current_dir: Option<&'a Path>,
}

impl<'a> Invocation<'a> {
    pub fn new(tool: &'static str, program: &'a Path) -> Self {
        Self {
            tool,
            program,
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg<S: AsRef<OsStr> + ?Sized>(mut self, arg: &'a S) -> Self {
        self.args.push(arg.as_ref());
        self
    }

    pub fn current_dir(mut self, dir: &'a Path) -> Self {
        self.current_dir = Some(dir);
        self
    }

    /// Run to completion, failing after `timeout`.
    pub async fn run(self, timeout: Duration) -> Result<(), ProverError> {
        let mut cmd = Command::new(self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(tool = self.tool, program = %self.program.display(), args = ?self.args, "spawning");
        let child = cmd.spawn().map_err(|source| ProverError::Spawn {
            tool: self.tool,
            source,
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ProverError::Spawn {
                tool: self.tool,
                source,
            })?,
            Err(_) => {
                tracing::error!(tool = self.tool, timeout_secs = timeout.as_secs(), "tool timed out");
                return Err(ProverError::Timeout {
                    tool: self.tool,
                    secs: timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::error!(
                tool = self.tool,
                code = ?output.status.code(),
                stderr = %stderr.trim(),
                "subprocess error"
            );
            return Err(ProverError::Subprocess {
                tool: self.tool,
                code: output.status.code(),
                stderr,
            });
        }

        if !stdout.trim().is_empty() {
            tracing::info!(tool = self.tool, "{}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            tracing::info!(tool = self.tool, stream = "stderr", "{}", stderr.trim());
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> &'static Path {
        Path::new("/bin/sh")
    }

    #[tokio::test]
    async fn zero_exit_with_stderr_chatter_succeeds() {
        let result = Invocation::new("sh", sh())
            .arg("-c")
            .arg("echo hello; echo 'warning: slow' >&2")
            .run(Duration::from_secs(5))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_zero_exit_returns_stderr_verbatim() {
        let err = Invocation::new("sh", sh())
            .arg("-c")
            .arg("echo 'Assert Failed' >&2; exit 3")
            .run(Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            ProverError::Subprocess { tool, code, stderr } => {
                assert_eq!(tool, "sh");
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "Assert Failed\n");
            }
            other => panic!("expected Subprocess, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        Invocation::new("sh", sh())
            .arg("-c")
            .arg("echo '{}' > marker.json")
            .current_dir(dir.path())
            .run(Duration::from_secs(5))
            .await
            .unwrap();
        assert!(dir.path().join("marker.json").exists());
    }

    #[tokio::test]
    async fn times_out_hung_tool() {
        let err = Invocation::new("sh", sh())
            .arg("-c")
            .arg("sleep 30")
            .run(Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, ProverError::Timeout { tool: "sh", .. }));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let err = Invocation::new("ghost", Path::new("/nonexistent/ghost-tool"))
            .run(Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProverError::Spawn { tool: "ghost", .. }));
    }
}
