//! The Executor - single entry point for running commands.
//!
//! The Executor is a stateless dispatcher that parses a command line, routes
//! the resulting [`Command`] to its handler and lets the handler write its
//! output to a [`Logger`].

use std::sync::Arc;

use tracing::debug;
use vtctl_core::{Context, Logger};
use vtctl_topo::TabletStore;

use crate::command::COMMANDS;
use crate::{Command, Result};

/// The command executor.
///
/// The Executor is **stateless**: it holds a reference to the topology store
/// but keeps no state of its own, so one instance serves any number of
/// concurrent calls.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use vtctl_core::{Context, MemoryLogger};
///
/// let executor = Executor::new(store);
/// let logger = MemoryLogger::new();
/// executor.execute(&Context::background(), &["ListAllTablets".into(), "cell1".into()], &logger)?;
/// print!("{}", logger.render());
/// ```
#[derive(Clone)]
pub struct Executor {
    store: Arc<dyn TabletStore>,
}

impl Executor {
    /// Create a new executor over a topology store.
    pub fn new(store: Arc<dyn TabletStore>) -> Self {
        Self { store }
    }

    /// The topology store commands run against.
    pub fn store(&self) -> &Arc<dyn TabletStore> {
        &self.store
    }

    /// Parse and run one command line.
    ///
    /// Output goes to `logger` in the order the command produces it.
    ///
    /// # Errors
    ///
    /// Any [`Error`](crate::Error) the command raises. A command that panics
    /// unwinds out of this call instead of returning.
    pub fn execute(&self, ctx: &Context, args: &[String], logger: &dyn Logger) -> Result<()> {
        let cmd = Command::parse(args)?;
        self.dispatch(ctx, cmd, logger)
    }

    /// Run an already parsed command.
    pub fn dispatch(&self, ctx: &Context, cmd: Command, logger: &dyn Logger) -> Result<()> {
        ctx.check()?;
        debug!(command = cmd.name(), "dispatching command");

        match cmd {
            Command::ListAllTablets {
                cells,
                keyspace,
                tablet_type,
            } => crate::handlers::tablets::list_all_tablets(
                &self.store,
                ctx,
                logger,
                cells,
                keyspace,
                tablet_type,
            ),
            Command::ListTablets { aliases } => {
                crate::handlers::tablets::list_tablets(&self.store, ctx, logger, aliases)
            }
            Command::GetTablet { alias } => {
                crate::handlers::tablets::get_tablet(&self.store, ctx, logger, alias)
            }
            Command::Panic => crate::handlers::debug::panic_on_purpose(),
        }
    }

    /// Usage text listing every command.
    pub fn usage() -> String {
        let mut out = String::from("Commands:\n");
        for (name, params, help) in COMMANDS {
            out.push_str(&format!("  {} {}\n    {}\n", name, params, help));
        }
        out
    }
}
