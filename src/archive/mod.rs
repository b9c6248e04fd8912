//! Release archive recognition and extraction.

mod tar_gz;

use crate::runtime::Runtime;
use anyhow::Result;
use std::path::Path;

pub use tar_gz::TarExtractor;

/// Trait for format-specific archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Send + Sync {
    /// Check the file content (not its name) for a supported archive format
    fn is_archive<R: Runtime + 'static>(&self, runtime: &R, archive_path: &Path) -> bool;

    /// Extract the archive into the specified directory, keeping its internal layout
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}
