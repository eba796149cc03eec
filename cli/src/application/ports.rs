//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`
//! or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::ManifestEntry;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Result of a process whose output was streamed to the job log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamedRun {
    pub status: ExitStatus,
    /// Whether the process wrote anything to stderr.
    pub wrote_stderr: bool,
}

impl StreamedRun {
    /// Success means exit code zero and a silent stderr.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.success() && !self.wrote_stderr
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
    /// Run a program in `cwd`, forwarding its stdout and stderr to ours.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    async fn run_streaming(&self, program: &str, args: &[&str], cwd: &Path) -> Result<StreamedRun>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the handful of filesystem operations the services need.
pub trait LocalFs {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Append `content`, creating the file if needed, and leave it at `mode`.
    fn append(&self, path: &Path, content: &str, mode: u32) -> Result<()>;
    /// Replace the file with `content` and leave it at `mode`.
    fn write(&self, path: &Path, content: &str, mode: u32) -> Result<()>;
}

// ── Release Registry Ports ────────────────────────────────────────────────────

/// Source of the release manifest.
#[allow(async_fn_in_trait)]
pub trait ManifestSource {
    /// Where the manifest comes from, for error messages.
    fn location(&self) -> &str;
    /// Fetch and decode the manifest.
    async fn fetch(&self) -> Result<Vec<ManifestEntry>>;
}

/// Fetches a release artifact to disk.
#[allow(async_fn_in_trait)]
pub trait ArtifactDownloader {
    /// Download `url` to `dest`, replacing any existing file.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

// ── Environment Port ──────────────────────────────────────────────────────────

/// Makes a variable visible to every later process of the job.
pub trait EnvExporter {
    /// Export `name=value`.
    fn export_variable(&self, name: &str, value: &str) -> Result<()>;
}
