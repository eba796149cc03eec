//! Application context — the production adapters for one run.
//!
//! Constructed once in `Cli::run()` and passed as `&AppContext` to the
//! command handler.

use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::env::{GithubEnvExporter, SharedEnv};
use crate::infra::fs::StdFs;
use crate::infra::release::{HttpDownloader, HttpManifest};
use crate::output::OutputContext;

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Process runner; children inherit every exported variable.
    pub runner: TokioCommandRunner,
    /// Exports variables to this run and to later workflow steps.
    pub env: GithubEnvExporter,
    pub fs: StdFs,
    pub manifest: HttpManifest,
    pub downloader: HttpDownloader,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let shared = SharedEnv::default();
        Self {
            output: OutputContext::new(no_color, quiet),
            runner: TokioCommandRunner::new(shared.clone()),
            env: GithubEnvExporter::from_env(shared),
            fs: StdFs,
            manifest: HttpManifest::default(),
            downloader: HttpDownloader,
        }
    }
}
