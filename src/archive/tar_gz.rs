use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use log::debug;
use std::io::{Chain, Cursor, Read};
use std::path::Path;
use tar::Archive;

use super::ArchiveExtractor;
use crate::runtime::Runtime;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extractor for tar archives, gzip-compressed or plain.
pub struct TarExtractor;

type Stream = Box<dyn Read + Send>;

impl TarExtractor {
    /// Opens the archive and peels off gzip compression when the magic bytes say so.
    fn open_stream<R: Runtime>(&self, runtime: &R, archive_path: &Path) -> Result<Stream> {
        let mut file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        let mut magic = Vec::with_capacity(2);
        (&mut file)
            .take(2)
            .read_to_end(&mut magic)
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        // Put the peeked bytes back in front of the remaining stream
        let stream: Chain<Cursor<Vec<u8>>, Stream> = Cursor::new(magic.clone()).chain(file);
        if magic == GZIP_MAGIC {
            debug!("{:?} is gzip compressed", archive_path);
            Ok(Box::new(GzDecoder::new(stream)))
        } else {
            Ok(Box::new(stream))
        }
    }

    fn check_first_entry<R: Runtime>(&self, runtime: &R, archive_path: &Path) -> Result<()> {
        let stream = self.open_stream(runtime, archive_path)?;
        let mut archive = Archive::new(stream);
        let mut entries = archive.entries().context("Failed to read tar entries")?;
        match entries.next() {
            Some(entry) => {
                entry.context("Failed to read first tar entry")?;
                Ok(())
            }
            None => bail!("Archive {:?} contains no entries", archive_path),
        }
    }
}

impl ArchiveExtractor for TarExtractor {
    fn is_archive<R: Runtime + 'static>(&self, runtime: &R, archive_path: &Path) -> bool {
        match self.check_first_entry(runtime, archive_path) {
            Ok(()) => true,
            Err(e) => {
                debug!("{:?} is not a tar archive: {:#}", archive_path, e);
                false
            }
        }
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting {:?} to {:?}...", archive_path, extract_to);
        runtime.create_dir_all(extract_to)?;

        let stream = self.open_stream(runtime, archive_path)?;
        let mut archive = Archive::new(stream);
        archive
            .unpack(extract_to)
            .with_context(|| format!("Failed to extract {:?} to {:?}", archive_path, extract_to))?;

        Ok(())
    }
}
