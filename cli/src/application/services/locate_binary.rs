//! Application service — find or fetch the Deployer binary.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{
    ArtifactDownloader, CommandRunner, LocalFs, ManifestSource, ProgressReporter,
};
use crate::domain::deployer::{
    BinaryLocatorRequest, COMPOSER_LOCK, ComposerLock, LOCAL_CANDIDATES, PHAR_NAME, find_release,
    strip_version_prefix,
};
use crate::domain::error::{BinaryNotFoundError, DownloadError};

/// Resolves the binary to run. First match wins:
///
/// 1. `explicit_path`, which must exist (never falls through);
/// 2. a conventional install under the working directory;
/// 3. a release download for `version_hint`, or for the version pinned in
///    `composer.lock`.
///
/// # Errors
///
/// Returns [`BinaryNotFoundError`] when nothing can be located and
/// [`DownloadError`] when the version is unknown or the download fails.
pub async fn locate_binary(
    request: &BinaryLocatorRequest,
    fs: &impl LocalFs,
    manifest: &impl ManifestSource,
    downloader: &impl ArtifactDownloader,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<PathBuf> {
    let cwd = &request.working_directory;

    if !request.explicit_path.is_empty() {
        let path = cwd.join(&request.explicit_path);
        if fs.exists(&path) {
            tracing::info!(path = %path.display(), "using explicit binary");
            return Ok(path);
        }
        return Err(
            BinaryNotFoundError::ExplicitPathMissing(PathBuf::from(&request.explicit_path)).into(),
        );
    }

    if let Some(local) = LOCAL_CANDIDATES
        .iter()
        .map(|c| cwd.join(c))
        .find(|p| fs.exists(p))
    {
        reporter.step(&format!("Using \"{}\".", local.display()));
        return Ok(local);
    }

    let version = match request.version_hint.as_str() {
        "" => locked_version(fs, cwd)?,
        hint => Some(hint.to_string()),
    };
    let Some(version) = version else {
        return Err(BinaryNotFoundError::NoCandidate.into());
    };

    let dest = cwd.join(PHAR_NAME);
    download_release(
        strip_version_prefix(&version),
        &dest,
        manifest,
        downloader,
        runner,
        reporter,
    )
    .await?;
    Ok(dest)
}

/// Version of Deployer pinned in `<cwd>/composer.lock`, if any.
fn locked_version(fs: &impl LocalFs, cwd: &Path) -> Result<Option<String>> {
    let lock_path = cwd.join(COMPOSER_LOCK);
    if !fs.exists(&lock_path) {
        return Ok(None);
    }
    let content = fs.read_to_string(&lock_path)?;
    let lock = ComposerLock::parse(&content)
        .with_context(|| format!("cannot parse {}", lock_path.display()))?;
    let version = lock.deployer_version().map(str::to_string);
    if let Some(v) = &version {
        tracing::info!(version = %v, "found deployer version in {COMPOSER_LOCK}");
    }
    Ok(version)
}

async fn download_release(
    version: &str,
    dest: &Path,
    manifest: &impl ManifestSource,
    downloader: &impl ArtifactDownloader,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    let entries = manifest.fetch().await.map_err(|e| DownloadError::Manifest {
        url: manifest.location().to_string(),
        reason: format!("{e:#}"),
    })?;
    let release = find_release(&entries, version).ok_or_else(|| DownloadError::UnknownVersion {
        version: version.to_string(),
        manifest_url: manifest.location().to_string(),
    })?;

    reporter.step(&format!("Downloading \"{}\".", release.url));
    downloader
        .download(&release.url, dest)
        .await
        .map_err(|e| DownloadError::Transfer {
            url: release.url.clone(),
            reason: format!("{e:#}"),
        })?;

    let dest_str = dest.to_string_lossy();
    let chmod_failed = |reason: String| DownloadError::Chmod {
        path: dest.to_path_buf(),
        reason,
    };
    let output = runner
        .run("chmod", &["+x", &dest_str])
        .await
        .map_err(|e| chmod_failed(format!("{e:#}")))?;
    if !output.status.success() || !output.stderr.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(chmod_failed(if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        })
        .into());
    }

    reporter.success(&format!("Deployer {version} downloaded to {}", dest.display()));
    Ok(())
}
