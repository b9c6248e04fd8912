//! Working directory and host information.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::thread;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to determine current directory")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn cpu_count_impl(&self) -> usize {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_env() {
        let runtime = RealRuntime;

        let cwd = runtime.current_dir().unwrap();
        assert!(cwd.is_absolute());

        assert!(runtime.cpu_count() >= 1);
    }
}
