//! Fatal error taxonomy of the library installer.
//!
//! Every variant terminates the process; they exist so the final message is
//! specific and so tests can tell the failure modes apart.

use std::path::PathBuf;

#[derive(Debug)]
pub enum InstallError {
    /// Neither `--build` nor `--path` was given, or a configuration value is unusable
    Configuration(String),
    /// An existing installation lacks the expected layout
    Path { what: String, path: PathBuf },
    /// Every download source failed
    Network(String),
    /// The checksum did not match for any download source
    Integrity { library: String, version: String },
    /// The downloaded file is not a recognised archive
    Archive(PathBuf),
    /// The native toolchain exited with a nonzero status
    Build { step: String, output: String },
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::Configuration(msg) => write!(f, "{}", msg),
            InstallError::Path { what, path } => {
                write!(f, "{} path for {} does not exist", what, path.display())
            }
            InstallError::Network(msg) => write!(f, "Download failed: {}", msg),
            InstallError::Integrity { library, version } => write!(
                f,
                "Checksum for {} library version {} does not match for fallback, too.",
                library, version
            ),
            InstallError::Archive(path) => {
                write!(f, "File {} is not a supported archive", path.display())
            }
            InstallError::Build { step, output } => {
                write!(f, "Make failed in step '{}' with:\n {}", step, output)
            }
        }
    }
}

impl std::error::Error for InstallError {}
