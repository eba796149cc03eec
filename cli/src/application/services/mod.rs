//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra` or `crate::output`.

pub mod deployer_run;
pub mod locate_binary;
pub mod ssh_bootstrap;
