//! Release registry infrastructure — manifest fetch and phar download over HTTPS.
//!
//! `ureq` is blocking, so each request runs on the blocking thread pool.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ArtifactDownloader, ManifestSource};
use crate::domain::deployer::{MANIFEST_URL, ManifestEntry};

/// Upper bound on a downloaded phar.
const MAX_ARTIFACT_BYTES: u64 = 100 * 1024 * 1024;

/// The deployer.org release manifest.
pub struct HttpManifest {
    url: String,
}

impl HttpManifest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for HttpManifest {
    fn default() -> Self {
        Self::new(MANIFEST_URL)
    }
}

impl ManifestSource for HttpManifest {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<ManifestEntry>> {
        let url = self.url.clone();
        tokio::task::spawn_blocking(move || {
            tracing::debug!(%url, "fetching manifest");
            let body = ureq::get(&url)
                .call()
                .with_context(|| format!("GET {url}"))?
                .into_string()
                .context("failed to read manifest body")?;
            serde_json::from_str::<Vec<ManifestEntry>>(&body).context("failed to decode manifest")
        })
        .await
        .context("spawn_blocking for manifest fetch")?
    }
}

/// Downloads release artifacts with `ureq`. Redirects are followed.
pub struct HttpDownloader;

impl ArtifactDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let url = url.to_string();
        let dest: PathBuf = dest.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let response = ureq::get(&url)
                .call()
                .with_context(|| format!("GET {url}"))?;
            let mut file = std::fs::File::create(&dest)
                .with_context(|| format!("creating {}", dest.display()))?;
            let copied = copy_capped(response.into_reader(), &mut file, MAX_ARTIFACT_BYTES)
                .with_context(|| format!("writing {}", dest.display()));
            let bytes = match copied {
                Ok(bytes) => bytes,
                Err(e) => {
                    drop(file);
                    let _ = std::fs::remove_file(&dest);
                    return Err(e);
                }
            };
            tracing::info!(%url, bytes, dest = %dest.display(), "downloaded");
            Ok::<(), anyhow::Error>(())
        })
        .await
        .context("spawn_blocking for download")?
    }
}

/// Copies at most `limit` bytes. A body larger than `limit` is an error,
/// never a truncated file.
fn copy_capped(reader: impl Read, writer: &mut impl Write, limit: u64) -> Result<u64> {
    let mut capped = reader.take(limit + 1);
    let bytes = std::io::copy(&mut capped, writer)?;
    anyhow::ensure!(
        bytes <= limit,
        "artifact exceeds the {limit}-byte download limit"
    );
    Ok(bytes)
}
