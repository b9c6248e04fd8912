use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::checksum::{Checksum, ChecksumTable};
use crate::download::DEFAULT_MAX_ATTEMPTS;
use crate::link::{INCLUDE_LINK, LIB_LINK, LinkNames};
use crate::runtime::Runtime;

pub const DEFAULT_VERSION: &str = "1.0.4";
pub const FALLBACK_BASE_URL: &str = "https://download.lammps.org/thirdparty";

/// Everything the installer needs to know about the library it installs.
///
/// Defaults describe ScaFaCoS; a JSON file may override any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Human readable library name used in messages
    pub library: String,
    /// Archive and source directory stem, e.g. `scafacos` in `scafacos-1.0.4.tar.gz`
    pub package: String,
    pub default_version: String,
    /// Primary download URL; `{version}` is substituted
    pub url_template: String,
    /// Mirror directory; the primary URL's file name is appended
    pub fallback_base_url: String,
    pub checksums: ChecksumTable,
    /// Arguments passed to `configure` after `--prefix`
    pub configure_args: Vec<String>,
    pub make_program: String,
    /// Install prefix directory name inside the working directory
    pub prefix_dir: String,
    pub include_link: String,
    pub lib_link: String,
    pub max_attempts: usize,
    /// Parallel make jobs; CPU count when unset
    pub jobs: Option<usize>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self::scafacos()
    }
}

impl InstallerConfig {
    pub fn scafacos() -> Self {
        Self {
            library: "ScaFaCoS".to_string(),
            package: "scafacos".to_string(),
            default_version: DEFAULT_VERSION.to_string(),
            url_template: "https://github.com/scafacos/scafacos/releases/download/v{version}/scafacos-{version}.tar.gz".to_string(),
            fallback_base_url: FALLBACK_BASE_URL.to_string(),
            checksums: ChecksumTable::from([
                ("1.0.1", Checksum::Md5("bd46d74e3296bd8a444d731bb10c1738".to_string())),
                ("1.0.4", Checksum::Md5("23867540ec32e63ce71d6ecc105278d2".to_string())),
            ]),
            configure_args: [
                "--disable-doc",
                "--enable-fcs-solvers=fmm,p2nfft,direct,ewald,p3m",
                "--with-internal-fftw",
                "--with-internal-pfft",
                "--with-internal-pnfft",
                "CC=mpicc",
                "FC=mpif90",
                "CXX=mpicxx",
                "F77=",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            make_program: "make".to_string(),
            prefix_dir: "build".to_string(),
            include_link: INCLUDE_LINK.to_string(),
            lib_link: LIB_LINK.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            jobs: None,
        }
    }

    /// Load a JSON config file; fields it omits keep their ScaFaCoS defaults.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read installer config {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse installer config {:?}", path))?;
        config.validate()?;
        debug!("Loaded installer config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.url_template.contains("{version}") {
            bail!("url_template must contain a {{version}} placeholder");
        }
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        if self.include_link.is_empty() || self.lib_link.is_empty() {
            bail!("link names must not be empty");
        }
        if self.include_link == self.lib_link {
            bail!("include_link and lib_link must differ");
        }
        Ok(())
    }

    pub fn primary_url(&self, version: &str) -> String {
        self.url_template.replace("{version}", version)
    }

    /// Mirror URL: fallback base plus the primary URL's file name.
    pub fn fallback_url(&self, version: &str) -> String {
        let primary = self.primary_url(version);
        let file_name = primary.rsplit('/').next().unwrap_or(&primary);
        format!("{}/{}", self.fallback_base_url.trim_end_matches('/'), file_name)
    }

    pub fn source_dir_name(&self, version: &str) -> String {
        format!("{}-{}", self.package, version)
    }

    pub fn archive_name(&self, version: &str) -> String {
        format!("{}.tar.gz", self.source_dir_name(version))
    }

    pub fn link_names(&self) -> LinkNames {
        LinkNames {
            include: self.include_link.clone(),
            lib: self.lib_link.clone(),
        }
    }
}
