//! Application service — run Deployer under the PHP interpreter.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::command::{DeployerArguments, PHP, command_spec};
use crate::domain::error::ExecutionError;

/// Runs `php <binary> <args…>` in `cwd`.
///
/// Output is streamed to the job log. A non-zero exit or any stderr output
/// counts as failure.
///
/// # Errors
///
/// Returns [`ExecutionError::Failed`] naming the attempted command.
pub async fn run_deployer(
    runner: &impl CommandRunner,
    binary: &Path,
    args: &DeployerArguments,
    cwd: &Path,
) -> Result<()> {
    let spec = command_spec(&binary.to_string_lossy(), args);
    let argv: Vec<&str> = spec.iter().map(String::as_str).collect();
    let command = spec.join(" ");

    tracing::info!(cwd = %cwd.display(), "running {PHP} {command}");
    let failed = || ExecutionError::Failed {
        command: command.clone(),
    };

    let run = runner.run_streaming(PHP, &argv, cwd).await.map_err(|e| {
        tracing::error!("cannot start {PHP}: {e:#}");
        failed()
    })?;
    if !run.succeeded() {
        tracing::debug!(status = %run.status, wrote_stderr = run.wrote_stderr, "deployer failed");
        return Err(failed().into());
    }
    Ok(())
}
