//! Download integrity checks against a table of known-good digests.

use anyhow::{Context, Result, anyhow, bail};
use log::debug;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::runtime::Runtime;

/// A known-good digest of a release archive.
///
/// Serialized as `md5:<hex>` or `sha256:<hex>`. A bare hex string is accepted
/// and its algorithm inferred from the length (32 = MD5, 64 = SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Checksum {
    Md5(String),
    Sha256(String),
}

impl Checksum {
    pub fn algorithm(&self) -> &'static str {
        match self {
            Checksum::Md5(_) => "md5",
            Checksum::Sha256(_) => "sha256",
        }
    }

    pub fn expected_hex(&self) -> &str {
        match self {
            Checksum::Md5(hex) | Checksum::Sha256(hex) => hex,
        }
    }

    /// Hash everything `reader` yields and return the lowercase hex digest.
    pub fn digest_reader<T: Read>(&self, reader: &mut T) -> Result<String> {
        match self {
            Checksum::Md5(_) => hash_stream::<Md5, T>(reader),
            Checksum::Sha256(_) => hash_stream::<Sha256, T>(reader),
        }
    }
}

fn hash_stream<D: Digest, T: Read>(reader: &mut T) -> Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).context("Failed to read data for checksum")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

impl FromStr for Checksum {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (algo, digest) = match s.split_once(':') {
            Some((algo, digest)) => (Some(algo.to_ascii_lowercase()), digest),
            None => (None, s),
        };

        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Invalid checksum '{}': expected a hex digest", s);
        }
        let digest = digest.to_ascii_lowercase();

        match (algo.as_deref(), digest.len()) {
            (Some("md5"), 32) | (None, 32) => Ok(Checksum::Md5(digest)),
            (Some("sha256"), 64) | (None, 64) => Ok(Checksum::Sha256(digest)),
            (Some(algo @ ("md5" | "sha256")), len) => Err(anyhow!(
                "Invalid {} checksum '{}': unexpected length {}",
                algo,
                s,
                len
            )),
            (Some(algo), _) => Err(anyhow!("Unsupported checksum algorithm '{}'", algo)),
            (None, len) => Err(anyhow!(
                "Cannot infer checksum algorithm for '{}' (length {})",
                s,
                len
            )),
        }
    }
}

impl TryFrom<String> for Checksum {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Checksum> for String {
    fn from(value: Checksum) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm(), self.expected_hex())
    }
}

/// Known checksums keyed by exact version string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecksumTable(BTreeMap<String, Checksum>);

impl ChecksumTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: impl Into<String>, checksum: Checksum) {
        self.0.insert(version.into(), checksum);
    }

    /// Exact-match lookup. Unknown versions return `None` and are not verified.
    pub fn lookup(&self, version: &str) -> Option<&Checksum> {
        self.0.get(version)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, Checksum); N]> for ChecksumTable {
    fn from(entries: [(&str, Checksum); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(version, checksum)| (version.to_string(), checksum))
                .collect(),
        )
    }
}

/// Check the file at `path` against `checksum`.
#[tracing::instrument(skip(runtime))]
pub fn verify_file<R: Runtime>(runtime: &R, checksum: &Checksum, path: &Path) -> Result<bool> {
    let mut reader = runtime
        .open(path)
        .with_context(|| format!("Failed to open {:?} for checksum verification", path))?;
    let actual = checksum.digest_reader(&mut reader)?;
    debug!(
        "{} of {:?}: {} (expected {})",
        checksum.algorithm(),
        path,
        actual,
        checksum.expected_hex()
    );
    Ok(actual.eq_ignore_ascii_case(checksum.expected_hex()))
}
