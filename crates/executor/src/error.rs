//! Error types for command execution.
//!
//! Every error here is raised intentionally by a command and reaches the
//! caller verbatim. Panics are deliberately not represented.

use vtctl_core::{ContextError, LoggerClosed};
use vtctl_topo::TopoError;

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Parsing | `EmptyCommand`, `UnknownCommand`, `InvalidArgs` | Bad command line |
/// | Topology | `Topo` | Store lookups, e.g. a cell with no tablets |
/// | Lifecycle | `Interrupted`, `StreamClosed` | The call ended before the command |
/// | System | `Serialization` | Output encoding |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No command name given
    #[error("no command specified")]
    EmptyCommand,

    /// Command name not recognized
    #[error("unknown command: {command}")]
    UnknownCommand {
        /// The name that was given
        command: String,
    },

    /// Arguments rejected by the command's parser
    #[error("{command}: {reason}")]
    InvalidArgs {
        /// Command name
        command: String,
        /// Parser message
        reason: String,
    },

    /// Topology store error, passed through unchanged
    #[error(transparent)]
    Topo(#[from] TopoError),

    /// The call was cancelled or timed out
    #[error("{0}")]
    Interrupted(#[from] ContextError),

    /// Nobody is reading the command's output any more
    #[error("{0}")]
    StreamClosed(#[from] LoggerClosed),

    /// Output could not be encoded
    #[error("serialization error: {reason}")]
    Serialization {
        /// What failed
        reason: String,
    },
}

impl Error {
    /// True when the command stopped because its call ended (cancelled,
    /// timed out, or nobody reading), rather than failing on its own.
    pub fn is_interruption(&self) -> bool {
        matches!(
            self,
            Error::Interrupted(_) | Error::StreamClosed(_) | Error::Topo(TopoError::Interrupted(_))
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}
