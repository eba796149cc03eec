//! SSH bootstrap domain types and pure helpers.

use std::path::{Path, PathBuf};

/// Fixed agent socket shared by every later step of the job.
pub const AUTH_SOCK: &str = "/tmp/ssh-auth.sock";

/// Environment variable that points SSH clients at the agent.
pub const AUTH_SOCK_VAR: &str = "SSH_AUTH_SOCK";

/// Line written to `~/.ssh/config` when no host keys are pinned.
pub const STRICT_HOST_KEY_CHECKING_OFF: &str = "StrictHostKeyChecking no\n";

/// Mode for every file the bootstrap writes under `~/.ssh`.
pub const SSH_FILE_MODE: u32 = 0o600;

/// SSH inputs for a single run. Empty strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshBootstrapConfig {
    pub private_key: String,
    pub known_hosts: String,
    pub ssh_config: String,
    pub skip: bool,
}

/// Paths under `<home>/.ssh` touched by the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshPaths {
    pub dir: PathBuf,
    pub known_hosts: PathBuf,
    pub config: PathBuf,
}

impl SshPaths {
    #[must_use]
    pub fn under_home(home: &Path) -> Self {
        let dir = home.join(".ssh");
        Self {
            known_hosts: dir.join("known_hosts"),
            config: dir.join("config"),
            dir,
        }
    }
}

/// Normalizes private key material before it is piped to `ssh-add`.
///
/// Strips every carriage return, trims surrounding whitespace, and ends the
/// key with exactly one newline. `ssh-add` refuses keys without the trailing
/// newline.
#[must_use]
pub fn normalize_private_key(key: &str) -> String {
    let mut normalized: String = key.chars().filter(|&c| c != '\r').collect();
    normalized = normalized.trim().to_string();
    normalized.push('\n');
    normalized
}
