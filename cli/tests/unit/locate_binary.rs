//! Unit tests for binary resolution.

use std::path::{Path, PathBuf};

use deployer_action::application::services::locate_binary::locate_binary;
use deployer_action::domain::error::{BinaryNotFoundError, DownloadError};
use deployer_action::domain::BinaryLocatorRequest;

use crate::helpers::{
    CannedManifest, CountingFs, FailingDownloader, RecordingReporter, RecordingRunner,
    StubDownloader, TEST_MANIFEST_URL, UnreachableManifest, release_url,
};

fn request(dir: &Path, explicit_path: &str, version_hint: &str) -> BinaryLocatorRequest {
    BinaryLocatorRequest {
        explicit_path: explicit_path.to_string(),
        version_hint: version_hint.to_string(),
        working_directory: dir.to_path_buf(),
    }
}

fn touch(dir: &Path, rel: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(&path, b"<?php").expect("write");
    path
}

struct Ports {
    fs: CountingFs,
    manifest: CannedManifest,
    downloader: StubDownloader,
    runner: RecordingRunner,
    reporter: RecordingReporter,
}

impl Ports {
    fn with_versions(versions: &[&str]) -> Self {
        Self {
            fs: CountingFs::default(),
            manifest: CannedManifest::with_versions(versions),
            downloader: StubDownloader::default(),
            runner: RecordingRunner::new(),
            reporter: RecordingReporter::default(),
        }
    }

    async fn locate(&self, req: &BinaryLocatorRequest) -> anyhow::Result<PathBuf> {
        locate_binary(
            req,
            &self.fs,
            &self.manifest,
            &self.downloader,
            &self.runner,
            &self.reporter,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Explicit path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_locate_existing_explicit_path_returns_it_without_probing() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let explicit = touch(dir.path(), "tools/dep");
    touch(dir.path(), "vendor/bin/dep");
    std::fs::write(dir.path().join("composer.lock"), "{}").expect("lock");
    let ports = Ports::with_versions(&["7.0.0"]);

    let req = request(dir.path(), &explicit.to_string_lossy(), "7.0.0");
    let found = ports.locate(&req).await.expect("locate");

    assert_eq!(found, explicit);
    assert_eq!(ports.fs.reads.get(), 1, "only the explicit path is checked");
    assert_eq!(ports.manifest.fetches.get(), 0);
}

#[tokio::test]
async fn test_locate_missing_explicit_path_fails_without_network() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    touch(dir.path(), "vendor/bin/dep");
    let ports = Ports::with_versions(&["7.0.0"]);
    let missing = dir.path().join("nope/dep");

    let req = request(dir.path(), &missing.to_string_lossy(), "7.0.0");
    let err = ports.locate(&req).await.expect_err("missing explicit path");

    assert!(matches!(
        err.downcast_ref::<BinaryNotFoundError>(),
        Some(BinaryNotFoundError::ExplicitPathMissing(p)) if *p == missing
    ));
    assert_eq!(ports.manifest.fetches.get(), 0);
    assert!(ports.downloader.urls.borrow().is_empty());
}

#[tokio::test]
async fn test_locate_relative_explicit_path_resolves_against_working_directory() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let explicit = touch(dir.path(), "bin/dep");
    let ports = Ports::with_versions(&[]);
    let found = ports
        .locate(&request(dir.path(), "bin/dep", ""))
        .await
        .expect("locate");
    assert_eq!(found, explicit);
}

// ---------------------------------------------------------------------------
// Conventional local paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_locate_prefers_vendor_phar_over_other_candidates() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let phar = touch(dir.path(), "vendor/bin/deployer.phar");
    touch(dir.path(), "vendor/bin/dep");
    touch(dir.path(), "deployer.phar");
    let ports = Ports::with_versions(&[]);

    let found = ports.locate(&request(dir.path(), "", "")).await.expect("locate");
    assert_eq!(found, phar);
    assert_eq!(
        ports.reporter.messages.borrow().first().map(String::as_str),
        Some(format!("Using \"{}\".", phar.display()).as_str())
    );
}

#[tokio::test]
async fn test_locate_falls_back_to_vendor_dep_then_root_phar() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let root_phar = touch(dir.path(), "deployer.phar");
    let ports = Ports::with_versions(&[]);
    assert_eq!(
        ports.locate(&request(dir.path(), "", "")).await.expect("locate"),
        root_phar
    );

    let dep = touch(dir.path(), "vendor/bin/dep");
    assert_eq!(
        ports.locate(&request(dir.path(), "", "")).await.expect("locate"),
        dep
    );
}

#[tokio::test]
async fn test_locate_local_candidate_wins_over_version_hint() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let dep = touch(dir.path(), "vendor/bin/dep");
    let ports = Ports::with_versions(&["7.0.0"]);
    let found = ports
        .locate(&request(dir.path(), "", "7.0.0"))
        .await
        .expect("locate");
    assert_eq!(found, dep);
    assert_eq!(ports.manifest.fetches.get(), 0);
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_locate_downloads_hinted_version_and_marks_executable() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let ports = Ports::with_versions(&["6.9.0", "2.1.0"]);

    let found = ports
        .locate(&request(dir.path(), "", "v2.1.0"))
        .await
        .expect("locate");

    let dest = dir.path().join("deployer.phar");
    assert_eq!(found, dest);
    assert!(dest.exists());
    assert_eq!(*ports.downloader.urls.borrow(), vec![release_url("2.1.0")]);

    let calls = ports.runner.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "chmod");
    assert_eq!(calls[0].args, vec!["+x".to_string(), dest.to_string_lossy().into_owned()]);
}

#[tokio::test]
async fn test_locate_registry_versions_are_not_normalized() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let ports = Ports::with_versions(&["v2.1.0"]);

    let err = ports
        .locate(&request(dir.path(), "", "v2.1.0"))
        .await
        .expect_err("no literal 2.1.0 in manifest");

    match err.downcast_ref::<DownloadError>() {
        Some(DownloadError::UnknownVersion {
            version,
            manifest_url,
        }) => {
            assert_eq!(version, "2.1.0");
            assert_eq!(manifest_url, TEST_MANIFEST_URL);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ports.downloader.urls.borrow().is_empty());
}

#[tokio::test]
async fn test_locate_uses_dev_section_of_composer_lock() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("composer.lock"),
        r#"{
            "packages": [{"name": "symfony/console", "version": "v6.4.0"}],
            "packages-dev": [{"name": "deployer/deployer", "version": "v7.3.1"}]
        }"#,
    )
    .expect("lock");
    let ports = Ports::with_versions(&["7.3.1"]);

    ports.locate(&request(dir.path(), "", "")).await.expect("locate");
    assert_eq!(*ports.downloader.urls.borrow(), vec![release_url("7.3.1")]);
}

#[tokio::test]
async fn test_locate_prefers_primary_section_of_composer_lock() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("composer.lock"),
        r#"{
            "packages": [{"name": "deployer/deployer", "version": "v7.0.0"}],
            "packages-dev": [{"name": "deployer/deployer", "version": "v6.8.0"}]
        }"#,
    )
    .expect("lock");
    let ports = Ports::with_versions(&["6.8.0", "7.0.0"]);

    ports.locate(&request(dir.path(), "", "")).await.expect("locate");
    assert_eq!(*ports.downloader.urls.borrow(), vec![release_url("7.0.0")]);
}

#[tokio::test]
async fn test_locate_version_hint_wins_over_composer_lock() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("composer.lock"),
        r#"{"packages": [{"name": "deployer/deployer", "version": "v7.0.0"}]}"#,
    )
    .expect("lock");
    let ports = Ports::with_versions(&["6.8.0", "7.0.0"]);

    ports
        .locate(&request(dir.path(), "", "6.8.0"))
        .await
        .expect("locate");
    assert_eq!(*ports.downloader.urls.borrow(), vec![release_url("6.8.0")]);
}

#[tokio::test]
async fn test_locate_nothing_to_go_on_is_binary_not_found() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let ports = Ports::with_versions(&["7.0.0"]);

    let err = ports
        .locate(&request(dir.path(), "", ""))
        .await
        .expect_err("nothing to resolve");

    assert!(matches!(
        err.downcast_ref::<BinaryNotFoundError>(),
        Some(BinaryNotFoundError::NoCandidate)
    ));
    assert_eq!(ports.manifest.fetches.get(), 0);
}

#[tokio::test]
async fn test_locate_lock_without_deployer_is_binary_not_found() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("composer.lock"),
        r#"{"packages": [{"name": "laravel/framework", "version": "v11.0.0"}], "packages-dev": []}"#,
    )
    .expect("lock");
    let ports = Ports::with_versions(&["7.0.0"]);

    let err = ports
        .locate(&request(dir.path(), "", ""))
        .await
        .expect_err("no deployer in lock");
    assert!(err.downcast_ref::<BinaryNotFoundError>().is_some());
}

#[tokio::test]
async fn test_locate_manifest_failure_is_download_error() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let ports = Ports::with_versions(&[]);
    let err = locate_binary(
        &request(dir.path(), "", "7.0.0"),
        &ports.fs,
        &UnreachableManifest,
        &ports.downloader,
        &ports.runner,
        &ports.reporter,
    )
    .await
    .expect_err("manifest unreachable");
    assert!(matches!(
        err.downcast_ref::<DownloadError>(),
        Some(DownloadError::Manifest { .. })
    ));
}

#[tokio::test]
async fn test_locate_chmod_failure_is_download_error() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let mut ports = Ports::with_versions(&["7.0.0"]);
    ports.runner = RecordingRunner::failing("chmod");

    let err = ports
        .locate(&request(dir.path(), "", "7.0.0"))
        .await
        .expect_err("chmod failure");
    assert!(matches!(
        err.downcast_ref::<DownloadError>(),
        Some(DownloadError::Chmod { .. })
    ));
}

#[tokio::test]
async fn test_locate_transfer_failure_is_download_error_without_chmod() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let ports = Ports::with_versions(&["7.0.0"]);
    let downloader = FailingDownloader::default();

    let err = locate_binary(
        &request(dir.path(), "", "7.0.0"),
        &ports.fs,
        &ports.manifest,
        &downloader,
        &ports.runner,
        &ports.reporter,
    )
    .await
    .expect_err("transfer failure");

    match err.downcast_ref::<DownloadError>() {
        Some(DownloadError::Transfer { url, reason }) => {
            assert_eq!(url, &release_url("7.0.0"));
            assert!(reason.contains("download limit"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(*downloader.urls.borrow(), vec![release_url("7.0.0")]);
    assert!(ports.runner.calls.borrow().is_empty(), "chmod must not run");
}
