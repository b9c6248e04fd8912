//! External command execution with captured output.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use std::process::Command;

use super::RealRuntime;

/// Result of a finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout followed by captured stderr.
    pub output: String,
}

impl RealRuntime {
    #[tracing::instrument(skip(self, args))]
    pub(crate) fn run_command_impl(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<CommandOutput> {
        debug!("Running {} {:?} in {:?}", program, args, cwd);

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("Failed to run {} in {:?}", program, cwd))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            output: combined,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_run_command_captures_stdout_and_stderr() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let out = runtime
            .run_command("sh", &sh("echo out; echo err 1>&2"), dir.path())
            .unwrap();

        assert!(out.success);
        assert_eq!(out.code, Some(0));
        assert!(out.output.contains("out"));
        assert!(out.output.contains("err"));
    }

    #[test]
    fn test_run_command_reports_nonzero_exit() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let out = runtime
            .run_command("sh", &sh("echo broken; exit 3"), dir.path())
            .unwrap();

        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert!(out.output.contains("broken"));
    }

    #[test]
    fn test_run_command_uses_working_directory() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        runtime
            .run_command("sh", &sh("touch marker"), dir.path())
            .unwrap();

        assert!(dir.path().join("marker").exists());
    }

    #[test]
    fn test_run_command_missing_program() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let result = runtime.run_command("definitely-not-a-real-program", &[], dir.path());
        assert!(result.is_err());
    }
}
