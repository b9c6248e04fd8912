//! Fetching release archives from an ordered list of sources.

mod policy;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use std::io::Write;
use std::path::Path;

use crate::http::HttpClient;
use crate::runtime::Runtime;

pub use policy::{DEFAULT_MAX_ATTEMPTS, FallbackPolicy};

/// Transfers the body behind a URL into a writer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Download: Send + Sync {
    async fn download(&self, url: &str, writer: Box<dyn Write + Send>) -> Result<u64>;
}

#[async_trait]
impl Download for HttpClient {
    async fn download(&self, url: &str, writer: Box<dyn Write + Send>) -> Result<u64> {
        self.download_file(url, move || Ok(writer)).await
    }
}

/// Downloads a file from a URL to `dest`, replacing any previous content.
///
/// `dest` is created before the request is sent, so a failed attempt leaves an
/// empty file behind; the next attempt overwrites it.
#[tracing::instrument(skip(runtime, downloader))]
pub async fn download_file<R: Runtime, D: Download + ?Sized>(
    runtime: &R,
    downloader: &D,
    url: &str,
    dest: &Path,
) -> Result<u64> {
    info!("Downloading file from {}...", url);

    let writer = runtime
        .create_file(dest)
        .with_context(|| format!("Failed to create download file at {:?}", dest))?;
    let bytes = downloader.download(url, writer).await?;

    info!("Download complete ({} bytes).", bytes);
    Ok(bytes)
}
