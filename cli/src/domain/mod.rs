//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod command;
pub mod deployer;
pub mod error;
pub mod inputs;
pub mod ssh;

pub use command::{DeployerArguments, command_spec};
pub use deployer::{BinaryLocatorRequest, ComposerLock, ManifestEntry};
pub use error::{BinaryNotFoundError, BootstrapError, ConfigError, DownloadError, ExecutionError};
pub use ssh::SshBootstrapConfig;
