//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while reading action inputs, before anything runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON in options: {0}")]
    InvalidOptions(String),

    #[error("Options must be a JSON object (got: {0})")]
    OptionsNotObject(String),

    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {name}\n\
         Support boolean input list: `true | True | TRUE | false | False | FALSE`"
    )]
    InvalidBool { name: &'static str, value: String },
}

// ── Binary resolution errors ──────────────────────────────────────────────────

/// No usable Deployer binary could be located.
#[derive(Debug, Error)]
pub enum BinaryNotFoundError {
    #[error("Deployer binary \"{}\" does not exist.", .0.display())]
    ExplicitPathMissing(PathBuf),

    #[error("Deployer binary not found. Please specify deployer-binary or deployer-version.")]
    NoCandidate,
}

/// The requested version could not be fetched.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("The version \"{version}\" does not exist in the \"{manifest_url}\" file.")]
    UnknownVersion {
        version: String,
        manifest_url: String,
    },

    #[error("cannot fetch manifest {url}: {reason}")]
    Manifest { url: String, reason: String },

    #[error("cannot download {url}: {reason}")]
    Transfer { url: String, reason: String },

    #[error("cannot make {} executable: {reason}", path.display())]
    Chmod { path: PathBuf, reason: String },
}

// ── SSH bootstrap errors ──────────────────────────────────────────────────────

/// A step of the SSH credential bootstrap failed.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot determine home directory")]
    NoHome,

    #[error("cannot prepare {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },

    #[error("ssh-agent failed to bind {socket}: {reason}")]
    AgentStart { socket: String, reason: String },

    #[error("cannot export {name}: {reason}")]
    Export { name: String, reason: String },

    #[error("ssh-add rejected the private key: {reason}")]
    KeyAdd { reason: String },
}

// ── Execution errors ──────────────────────────────────────────────────────────

/// The Deployer process exited non-zero or wrote to stderr.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed: dep {command}")]
    Failed { command: String },
}
