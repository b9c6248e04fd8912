//! Library installer: download, verify, unpack, build and link a native library.

pub mod config;

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveExtractor, TarExtractor};
use crate::checksum::verify_file;
use crate::download::{Download, FallbackPolicy, download_file};
use crate::error::InstallError;
use crate::http::HttpClient;
use crate::link::{LinkTargets, relink};
use crate::runtime::Runtime;
use crate::toolchain::{autotools_steps, run_build};

pub use config::InstallerConfig;

/// What the installer should link against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Download and build from source
    Build,
    /// Use an existing installation at this path
    UsePath(PathBuf),
}

impl Directive {
    /// Exactly one of `build` or `path` must be given.
    pub fn from_flags(build: bool, path: Option<PathBuf>) -> Result<Self, InstallError> {
        match (build, path) {
            (true, None) => Ok(Directive::Build),
            (false, Some(path)) => Ok(Directive::UsePath(path)),
            (true, Some(_)) => Err(InstallError::Configuration(
                "--build and --path are mutually exclusive".to_string(),
            )),
            (false, None) => Err(InstallError::Configuration(
                "either --build or --path must be given".to_string(),
            )),
        }
    }
}

/// Paths derived from the working directory and the requested version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    pub work_dir: PathBuf,
    pub archive: PathBuf,
    pub source_dir: PathBuf,
    pub prefix: PathBuf,
}

impl InstallPaths {
    pub fn new(config: &InstallerConfig, work_dir: &Path, version: &str) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            archive: work_dir.join(config.archive_name(version)),
            source_dir: work_dir.join(config.source_dir_name(version)),
            prefix: work_dir.join(&config.prefix_dir),
        }
    }
}

/// Arguments of one installer invocation, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    pub build: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Entry point used by the `install-scafacos` binary.
#[tracing::instrument(skip(runtime))]
pub async fn install<R: Runtime + 'static>(runtime: R, request: InstallRequest) -> Result<LinkTargets> {
    let directive = Directive::from_flags(request.build, request.path)?;

    let config = match &request.config {
        Some(path) => InstallerConfig::load(&runtime, path)?,
        None => InstallerConfig::scafacos(),
    };
    let version = request
        .version
        .unwrap_or_else(|| config.default_version.clone());

    let work_dir = match request.work_dir {
        Some(dir) => {
            runtime.create_dir_all(&dir)?;
            runtime.canonicalize(&dir)?
        }
        None => runtime.current_dir()?,
    };

    let installer = Installer::new(runtime, HttpClient::with_defaults()?, TarExtractor, config);
    installer.run(&directive, &version, &work_dir).await
}

pub struct Installer<R: Runtime, D: Download, E: ArchiveExtractor> {
    runtime: R,
    downloader: D,
    extractor: E,
    config: InstallerConfig,
}

impl<R: Runtime + 'static, D: Download, E: ArchiveExtractor> Installer<R, D, E> {
    pub fn new(runtime: R, downloader: D, extractor: E, config: InstallerConfig) -> Self {
        Self {
            runtime,
            downloader,
            extractor,
            config,
        }
    }

    /// Carry out `directive` and leave the two links in `work_dir`.
    #[tracing::instrument(skip(self))]
    pub async fn run(
        &self,
        directive: &Directive,
        version: &str,
        work_dir: &Path,
    ) -> Result<LinkTargets> {
        let targets = match directive {
            Directive::UsePath(root) => self.resolve_existing(root)?,
            Directive::Build => {
                let paths = InstallPaths::new(&self.config, work_dir, version);
                self.fetch(&paths, version).await?;
                self.unpack(&paths)?;
                self.build(&paths)?
            }
        };

        println!(
            "Creating links to {} include and lib files",
            self.config.library
        );
        relink(&self.runtime, work_dir, &self.config.link_names(), &targets)?;
        Ok(targets)
    }

    /// Validate an existing installation before anything touches the network.
    fn resolve_existing(&self, root: &Path) -> Result<LinkTargets> {
        if !self.runtime.is_dir(&root.join("include")) {
            return Err(InstallError::Path {
                what: format!("{} include", self.config.library),
                path: root.to_path_buf(),
            }
            .into());
        }
        if !self.runtime.is_dir(&root.join("lib64")) && !self.runtime.is_dir(&root.join("lib")) {
            return Err(InstallError::Path {
                what: format!("{} lib", self.config.library),
                path: root.to_path_buf(),
            }
            .into());
        }

        let root = self.runtime.canonicalize(root)?;
        Ok(LinkTargets::for_existing(&self.runtime, &root))
    }

    /// Download the release archive, falling back to the mirror on a network
    /// failure or a checksum mismatch.
    async fn fetch(&self, paths: &InstallPaths, version: &str) -> Result<()> {
        println!("Downloading {} ...", self.config.library);

        let checksum = self.config.checksums.lookup(version);
        if checksum.is_none() {
            warn!(
                "No known checksum for {} version {}; the download will not be verified",
                self.config.library, version
            );
        }

        let policy = FallbackPolicy::new(vec![
            self.config.primary_url(version),
            self.config.fallback_url(version),
        ])
        .with_max_attempts(self.config.max_attempts);

        let runtime = &self.runtime;
        let downloader = &self.downloader;
        let archive = paths.archive.as_path();
        let library = self.config.library.as_str();

        policy
            .run("download", |url| async move {
                download_file(runtime, downloader, &url, archive)
                    .await
                    .map_err(|e| InstallError::Network(format!("{}: {:#}", url, e)))?;

                if let Some(checksum) = checksum {
                    if !verify_file(runtime, checksum, archive)? {
                        println!("Checksum did not match for {}.", url);
                        return Err(InstallError::Integrity {
                            library: library.to_string(),
                            version: version.to_string(),
                        }
                        .into());
                    }
                    debug!("{} checksum verified for {}", checksum.algorithm(), url);
                }
                Ok::<(), anyhow::Error>(())
            })
            .await
    }

    /// Replace any previous source tree with the content of the archive.
    fn unpack(&self, paths: &InstallPaths) -> Result<()> {
        println!("Unpacking {} tarball ...", self.config.library);

        if self.runtime.exists(&paths.source_dir) {
            debug!("Removing previous source tree {:?}", paths.source_dir);
            self.runtime.remove_dir_all(&paths.source_dir)?;
        }

        if !self.extractor.is_archive(&self.runtime, &paths.archive) {
            return Err(InstallError::Archive(paths.archive.clone()).into());
        }
        self.extractor
            .extract(&self.runtime, &paths.archive, &paths.work_dir)?;
        self.runtime
            .remove_file(&paths.archive)
            .with_context(|| format!("Failed to remove {:?}", paths.archive))?;

        if !self.runtime.is_dir(&paths.source_dir) {
            anyhow::bail!(
                "Archive did not contain the expected directory {:?}",
                paths.source_dir
            );
        }
        Ok(())
    }

    /// Build and install, then check the prefix holds both link targets.
    fn build(&self, paths: &InstallPaths) -> Result<LinkTargets> {
        println!("Building {} ...", self.config.library);

        let jobs = self
            .config
            .jobs
            .unwrap_or_else(|| self.runtime.cpu_count());
        let steps = autotools_steps(
            &paths.source_dir,
            &paths.prefix,
            &self.config.configure_args,
            &self.config.make_program,
            jobs,
        );
        let output = run_build(&self.runtime, &steps, &paths.source_dir)?;
        println!("{}", output);

        let targets = LinkTargets::for_build(&paths.prefix);
        for (kind, dir) in [("include", &targets.include), ("lib", &targets.lib)] {
            if !self.runtime.is_dir(dir) {
                return Err(InstallError::Build {
                    step: "make install".to_string(),
                    output: format!(
                        "{}\n{} directory {} was not created",
                        output.trim_end(),
                        kind,
                        dir.display()
                    ),
                }
                .into());
            }
        }
        Ok(targets)
    }
}
