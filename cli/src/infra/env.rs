//! Environment export — implements `EnvExporter` for GitHub Actions.
//!
//! An exported variable is recorded in a [`SharedEnv`] so this process's own
//! children see it, and appended to the `GITHUB_ENV` file so later workflow
//! steps see it too. The process environment itself is never mutated.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};

use crate::application::ports::EnvExporter;

/// Variables exported during this run, shared with the command runner.
#[derive(Debug, Clone, Default)]
pub struct SharedEnv(Arc<Mutex<Vec<(String, String)>>>);

impl SharedEnv {
    /// Snapshot of exported variables in export order.
    #[must_use]
    pub fn vars(&self) -> Vec<(String, String)> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set(&self, name: &str, value: &str) {
        let mut vars = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        vars.retain(|(n, _)| n != name);
        vars.push((name.to_string(), value.to_string()));
    }
}

/// Production `EnvExporter`.
pub struct GithubEnvExporter {
    env_file: Option<PathBuf>,
    shared: SharedEnv,
}

impl GithubEnvExporter {
    /// Exporter writing to the file named by `GITHUB_ENV`, when set.
    #[must_use]
    pub fn from_env(shared: SharedEnv) -> Self {
        let env_file = std::env::var_os("GITHUB_ENV")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::with_file(env_file, shared)
    }

    /// Exporter writing to an arbitrary file (for testing).
    #[must_use]
    pub fn with_file(env_file: Option<PathBuf>, shared: SharedEnv) -> Self {
        Self { env_file, shared }
    }
}

impl EnvExporter for GithubEnvExporter {
    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        anyhow::ensure!(
            !value.contains('\n') && !name.contains('='),
            "cannot export {name}: names may not contain `=` and values must be single-line"
        );
        self.shared.set(name, value);

        let Some(path) = &self.env_file else {
            tracing::debug!(name, "GITHUB_ENV not set, export limited to this run");
            return Ok(());
        };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        writeln!(file, "{name}={value}").with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(name, file = %path.display(), "exported");
        Ok(())
    }
}
