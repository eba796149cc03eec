//! CLI argument parsing with clap derive
//!
//! Every action input is a long flag that falls back to the variable the
//! Actions runner sets for it, `INPUT_<NAME>` with the name upper-cased.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{Args, Parser};

use crate::app::AppContext;
use crate::commands;
use crate::domain::error::ConfigError;
use crate::domain::inputs::{self, names};
use crate::domain::{BinaryLocatorRequest, DeployerArguments, SshBootstrapConfig};

/// Bootstrap SSH credentials and run Deployer in a CI job
#[derive(Parser)]
#[command(name = "deployer-action", version)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Raw action inputs, exactly as the runner hands them over.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Deployer command to run, e.g. "deploy production"
    #[arg(long = "dep", env = "INPUT_DEP", default_value = "")]
    pub dep: String,

    /// Path to an existing Deployer binary
    #[arg(long, env = "INPUT_DEPLOYER-BINARY", default_value = "")]
    pub deployer_binary: String,

    /// Deployer version to download, e.g. "v7.3.1"
    #[arg(long, env = "INPUT_DEPLOYER-VERSION", default_value = "")]
    pub deployer_version: String,

    /// Deployer options as a JSON object, passed as `-o key=>value`
    #[arg(long, env = "INPUT_OPTIONS", default_value = "")]
    pub options: String,

    /// Verbosity flag passed to Deployer, e.g. "-vvv"
    #[arg(long, env = "INPUT_VERBOSITY", default_value = "")]
    pub verbosity: String,

    /// Force ANSI output ("true"/"false")
    #[arg(long, env = "INPUT_ANSI", default_value = "false")]
    pub ansi: String,

    /// Skip SSH agent and key setup ("true"/"false")
    #[arg(long, env = "INPUT_SKIP-SSH-SETUP", default_value = "false")]
    pub skip_ssh_setup: String,

    /// Contents written to ~/.ssh/config
    #[arg(long, env = "INPUT_SSH-CONFIG", default_value = "", hide_env_values = true)]
    pub ssh_config: String,

    /// Entries appended to ~/.ssh/known_hosts
    #[arg(long, env = "INPUT_KNOWN-HOSTS", default_value = "", hide_env_values = true)]
    pub known_hosts: String,

    /// Private key loaded into the SSH agent
    #[arg(long, env = "INPUT_PRIVATE-KEY", default_value = "", hide_env_values = true)]
    pub private_key: String,

    /// Run Deployer from this directory, relative to the current one
    #[arg(long, env = "INPUT_SUB-DIRECTORY", default_value = "")]
    pub sub_directory: String,
}

/// Validated inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    pub ssh: SshBootstrapConfig,
    pub locator: BinaryLocatorRequest,
    pub args: DeployerArguments,
}

impl InputArgs {
    /// Validates every input against `cwd`. Runs before any side effect.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing command, malformed options JSON,
    /// or a boolean input outside the YAML core schema.
    pub fn validate(&self, cwd: &Path) -> Result<ActionInputs, ConfigError> {
        let sub_directory = self.sub_directory.trim();
        let working_directory = if sub_directory.is_empty() {
            cwd.to_path_buf()
        } else {
            cwd.join(sub_directory)
        };

        Ok(ActionInputs {
            ssh: SshBootstrapConfig {
                private_key: self.private_key.clone(),
                known_hosts: self.known_hosts.clone(),
                ssh_config: self.ssh_config.clone(),
                skip: inputs::parse_bool(names::SSH_SKIP_SETUP, &self.skip_ssh_setup)?,
            },
            locator: BinaryLocatorRequest {
                explicit_path: self.deployer_binary.trim().to_string(),
                version_hint: self.deployer_version.trim().to_string(),
                working_directory,
            },
            args: DeployerArguments {
                command: inputs::parse_command(&self.dep)?,
                ansi_output: inputs::parse_bool(names::DEPLOYER_ANSI_OUTPUT, &self.ansi)?,
                verbosity: self.verbosity.trim().to_string(),
                options: inputs::parse_options(&self.options)?,
            },
        })
    }
}

impl Cli {
    /// Execute the action: SSH bootstrap, then Deployer.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step; nothing is retried.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            inputs,
        } = self;
        let cwd: PathBuf = std::env::current_dir().context("cannot determine current directory")?;
        let inputs = inputs.validate(&cwd)?;
        let app = AppContext::new(no_color, quiet);
        commands::run::run(&app, &inputs).await
    }
}
