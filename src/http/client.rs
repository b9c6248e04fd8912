//! Streaming download client.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use std::io::Write;

use super::status::check_status;

/// Thin wrapper around a reqwest client that streams response bodies to a writer.
///
/// A single request is made per call; falling back to another source is the
/// caller's decision (see [`crate::download::FallbackPolicy`]).
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client with the crate's user agent.
    pub fn with_defaults() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lmp-tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Downloads `url` into the writer produced by `create_writer`.
    /// `create_writer` runs after the status check, so an error status never
    /// reaches it; whatever the writer wraps may still have been set up earlier
    /// by the caller.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to start download request for {}", url))?;

        check_status(response.status(), url)?;

        let mut writer = create_writer()?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read chunk from download stream")?
        {
            writer
                .write_all(&chunk)
                .context("Failed to write chunk to file")?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().context("Failed to flush downloaded file")?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
