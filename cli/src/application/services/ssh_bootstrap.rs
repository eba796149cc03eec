//! Application service — SSH credential bootstrap.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, EnvExporter, LocalFs, ProgressReporter};
use crate::domain::error::BootstrapError;
use crate::domain::ssh::{
    AUTH_SOCK, AUTH_SOCK_VAR, SSH_FILE_MODE, STRICT_HOST_KEY_CHECKING_OFF, SshBootstrapConfig,
    SshPaths, normalize_private_key,
};

/// Starts an SSH agent on the fixed socket, loads the private key, and
/// writes host-key trust configuration under `<home>/.ssh`.
///
/// Returns immediately without touching anything when `config.skip` is set.
/// Each step runs only after the previous one succeeded; a started agent is
/// left running if a later step fails.
///
/// # Errors
///
/// Returns [`BootstrapError`] if `home` is `None`, a filesystem write fails,
/// or `ssh-agent`/`ssh-add` exits non-zero.
pub async fn bootstrap(
    config: &SshBootstrapConfig,
    home: Option<&Path>,
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    env: &impl EnvExporter,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    if config.skip {
        tracing::info!("ssh setup skipped");
        return Ok(());
    }

    let home = home.ok_or(BootstrapError::NoHome)?;
    let paths = SshPaths::under_home(home);

    if !fs.exists(&paths.dir) {
        fs.create_dir_all(&paths.dir)
            .map_err(|e| filesystem(&paths.dir, &e))?;
    }

    reporter.step(&format!("starting ssh-agent on {AUTH_SOCK}"));
    let output = runner
        .run("ssh-agent", &["-a", AUTH_SOCK])
        .await
        .map_err(|e| BootstrapError::AgentStart {
            socket: AUTH_SOCK.to_string(),
            reason: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(BootstrapError::AgentStart {
            socket: AUTH_SOCK.to_string(),
            reason: failure_reason(&output),
        }
        .into());
    }
    env.export_variable(AUTH_SOCK_VAR, AUTH_SOCK)
        .map_err(|e| BootstrapError::Export {
            name: AUTH_SOCK_VAR.to_string(),
            reason: format!("{e:#}"),
        })?;

    if !config.private_key.is_empty() {
        add_private_key(runner, &config.private_key).await?;
        reporter.success("private key added to agent");
    }

    if config.known_hosts.is_empty() {
        fs.append(&paths.config, STRICT_HOST_KEY_CHECKING_OFF, SSH_FILE_MODE)
            .map_err(|e| filesystem(&paths.config, &e))?;
        reporter.warn("no known hosts given, strict host key checking disabled");
    } else {
        fs.append(&paths.known_hosts, &config.known_hosts, SSH_FILE_MODE)
            .map_err(|e| filesystem(&paths.known_hosts, &e))?;
    }

    // Replaces the strict-checking line above when both apply.
    if !config.ssh_config.is_empty() {
        fs.write(&paths.config, &config.ssh_config, SSH_FILE_MODE)
            .map_err(|e| filesystem(&paths.config, &e))?;
    }

    reporter.success("ssh agent ready");
    Ok(())
}

async fn add_private_key(runner: &impl CommandRunner, key: &str) -> Result<()> {
    let key = normalize_private_key(key);
    let output = runner
        .run_with_stdin("ssh-add", &["-"], key.as_bytes())
        .await
        .map_err(|e| BootstrapError::KeyAdd {
            reason: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(BootstrapError::KeyAdd {
            reason: failure_reason(&output),
        }
        .into());
    }
    Ok(())
}

fn filesystem(path: &Path, err: &anyhow::Error) -> BootstrapError {
    BootstrapError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    }
}

fn failure_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr.to_string()
    }
}
