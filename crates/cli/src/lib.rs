//! Shared pieces of the `vtctlclient` and `vtctld` binaries.

pub mod commands;
pub mod config;
pub mod run;

pub use config::{ConfigError, VtctlConfig, CONFIG_FILE_NAME};
