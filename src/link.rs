//! The symlink contract: two fixed, version-independent link names that
//! downstream builds use to find headers and libraries.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub const INCLUDE_LINK: &str = "includelink";
pub const LIB_LINK: &str = "liblink";

/// Directories the two links should point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTargets {
    pub include: PathBuf,
    pub lib: PathBuf,
}

impl LinkTargets {
    /// Targets inside a freshly built install prefix.
    pub fn for_build(prefix: &Path) -> Self {
        Self {
            include: prefix.join("include"),
            lib: prefix.join("lib"),
        }
    }

    /// Targets inside an existing installation; `lib64` wins over `lib`.
    pub fn for_existing<R: Runtime>(runtime: &R, root: &Path) -> Self {
        let lib64 = root.join("lib64");
        let lib = if runtime.is_dir(&lib64) {
            lib64
        } else {
            root.join("lib")
        };
        Self {
            include: root.join("include"),
            lib,
        }
    }
}

/// Names of the two links inside the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNames {
    pub include: String,
    pub lib: String,
}

impl Default for LinkNames {
    fn default() -> Self {
        Self {
            include: INCLUDE_LINK.to_string(),
            lib: LIB_LINK.to_string(),
        }
    }
}

/// Replace whatever sits at the two link names with fresh links to `targets`.
#[tracing::instrument(skip(runtime))]
pub fn relink<R: Runtime>(
    runtime: &R,
    dir: &Path,
    names: &LinkNames,
    targets: &LinkTargets,
) -> Result<()> {
    let pairs = [
        (dir.join(&names.include), &targets.include),
        (dir.join(&names.lib), &targets.lib),
    ];

    for (link, _) in &pairs {
        remove_stale(runtime, link)?;
    }

    for (link, target) in &pairs {
        debug!("Linking {:?} -> {:?}", link, target);
        runtime
            .symlink(target, link)
            .with_context(|| format!("Failed to link {:?} to {:?}", link, target))?;
        if !runtime.is_dir(link) {
            warn!("{:?} does not resolve to a directory ({:?})", link, target);
        }
    }

    Ok(())
}

/// Symlinks (dangling or not) and plain files are removed; directories are left alone.
fn remove_stale<R: Runtime>(runtime: &R, link: &Path) -> Result<()> {
    if runtime.is_symlink(link) {
        debug!("Removing old link {:?}", link);
        runtime.remove_symlink(link)
    } else if runtime.is_file(link) {
        debug!("Removing file {:?} in the way of a link", link);
        runtime.remove_file(link)
    } else if runtime.exists(link) {
        bail!("{:?} exists and is not a file or symlink", link)
    } else {
        Ok(())
    }
}
