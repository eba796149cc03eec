//! The action's single command: SSH bootstrap, then Deployer.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deployer_run::run_deployer;
use crate::application::services::locate_binary::locate_binary;
use crate::application::services::ssh_bootstrap::bootstrap;
use crate::cli::ActionInputs;
use crate::output::TerminalReporter;

/// Run the action with validated inputs.
///
/// # Errors
///
/// Returns the first failure of SSH bootstrap, binary resolution, or the
/// Deployer run.
pub async fn run(app: &AppContext, inputs: &ActionInputs) -> Result<()> {
    let reporter = TerminalReporter::new(&app.output);

    let home = dirs::home_dir();
    bootstrap(
        &inputs.ssh,
        home.as_deref(),
        &app.runner,
        &app.fs,
        &app.env,
        &reporter,
    )
    .await?;

    let binary = locate_binary(
        &inputs.locator,
        &app.fs,
        &app.manifest,
        &app.downloader,
        &app.runner,
        &reporter,
    )
    .await?;

    run_deployer(
        &app.runner,
        &binary,
        &inputs.args,
        &inputs.locator.working_directory,
    )
    .await
}
