//! Deployer binary resolution — request types, lockfile and manifest lookup.

use std::path::PathBuf;

use serde::Deserialize;

/// Remote index of released Deployer phars.
pub const MANIFEST_URL: &str = "https://deployer.org/manifest.json";

/// Package name tracked in `composer.lock`.
pub const DEPLOYER_PACKAGE: &str = "deployer/deployer";

/// Lockfile consulted when no version is given.
pub const COMPOSER_LOCK: &str = "composer.lock";

/// File name a downloaded phar is written to inside the working directory.
pub const PHAR_NAME: &str = "deployer.phar";

/// Conventional install locations, probed in order.
pub const LOCAL_CANDIDATES: [&str; 3] = ["vendor/bin/deployer.phar", "vendor/bin/dep", "deployer.phar"];

/// What the caller asked for. Empty strings mean "not supplied".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryLocatorRequest {
    pub explicit_path: String,
    pub version_hint: String,
    pub working_directory: PathBuf,
}

/// One record of the remote manifest. `name` and `sha1` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub version: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
struct LockedPackage {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

/// The two sections of `composer.lock` that can pin Deployer.
#[derive(Debug, Default, Deserialize)]
pub struct ComposerLock {
    #[serde(default)]
    packages: Vec<LockedPackage>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Vec<LockedPackage>,
}

impl ComposerLock {
    /// Parses lockfile JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid JSON or a section has the
    /// wrong shape.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Version of `deployer/deployer`, checking `packages` before
    /// `packages-dev`. An empty version in the primary section falls through.
    #[must_use]
    pub fn deployer_version(&self) -> Option<&str> {
        fn find(section: &[LockedPackage]) -> Option<&str> {
            section
                .iter()
                .find(|p| p.name == DEPLOYER_PACKAGE)
                .map(|p| p.version.as_str())
                .filter(|v| !v.is_empty())
        }
        find(&self.packages).or_else(|| find(&self.packages_dev))
    }
}

/// Strips exactly one leading `v` so `v7.0.0` and `7.0.0` are the same request.
#[must_use]
pub fn strip_version_prefix(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// First manifest entry whose version equals `version` literally.
#[must_use]
pub fn find_release<'a>(manifest: &'a [ManifestEntry], version: &str) -> Option<&'a ManifestEntry> {
    manifest.iter().find(|e| e.version == version)
}
