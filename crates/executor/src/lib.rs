//! # vtctl Executor
//!
//! Runs one administrative command line against the tablet topology and
//! writes its output to a [`Logger`](vtctl_core::Logger).
//!
//! - [`Command`] - A parsed command line
//! - [`Executor`] - Dispatches commands to their handlers
//! - [`Error`] - Errors a command raises on purpose
//!
//! ## Commands
//!
//! | Command | Output |
//! |---------|--------|
//! | `ListAllTablets [--keyspace K] [--tablet_type T] [cell1,cell2]` | One line per tablet |
//! | `ListTablets <alias> ...` | One line per alias |
//! | `GetTablet <alias>` | The tablet record as JSON |
//! | `Panic` | Nothing; panics on purpose |
//!
//! A panic inside a command is not an [`Error`]; it unwinds out of
//! [`Executor::execute`] and is left to whoever supervises the call.

#![warn(missing_docs)]

mod command;
mod error;
mod executor;
mod format;

// Handler modules
mod handlers;

pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use format::{format_tablet_line, format_tags};
pub use handlers::debug::PANIC_MESSAGE;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
