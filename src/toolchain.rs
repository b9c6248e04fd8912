//! Driving the library's native configure/make toolchain.

use anyhow::Result;
use log::{debug, info};
use std::path::Path;

use crate::error::InstallError;
use crate::runtime::Runtime;

/// One external command of the native build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

impl BuildStep {
    pub fn new(name: &str, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            program: program.into(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// configure, parallel make, make install.
pub fn autotools_steps(
    source_dir: &Path,
    prefix: &Path,
    configure_args: &[String],
    make_program: &str,
    jobs: usize,
) -> Vec<BuildStep> {
    let mut args = vec![format!("--prefix={}", prefix.display())];
    args.extend(configure_args.iter().cloned());

    vec![
        BuildStep::new(
            "configure",
            source_dir.join("configure").to_string_lossy(),
            args,
        ),
        BuildStep::new("make", make_program, vec![format!("-j{}", jobs.max(1))]),
        BuildStep::new("make install", make_program, vec!["install".to_string()]),
    ]
}

/// Runs the steps in order inside `source_dir`, stopping at the first failure.
/// Returns the combined output of all steps.
#[tracing::instrument(skip(runtime, steps))]
pub fn run_build<R: Runtime>(runtime: &R, steps: &[BuildStep], source_dir: &Path) -> Result<String> {
    let mut transcript = String::new();

    for step in steps {
        info!("Running {}", step.command_line());
        let out = runtime.run_command(&step.program, &step.args, source_dir)?;
        transcript.push_str(&out.output);

        if !out.success {
            debug!("{} exited with {:?}", step.name, out.code);
            return Err(InstallError::Build {
                step: step.name.clone(),
                output: transcript,
            }
            .into());
        }
    }

    Ok(transcript)
}
