//! Terminal errors of a command stream
//!
//! A command stream ends in exactly one of: a clean end-of-stream, or one of
//! the [`StreamError`] variants below. Server and client share this type so
//! the classification survives any transport.

use serde::{Deserialize, Serialize};

use crate::context::ContextError;

/// Marker prefixed to the message of a fault caught at the session boundary.
pub const PANIC_MARKER: &str = "uncaught vtctl panic";

/// How a command stream failed.
///
/// | Variant | Produced by |
/// |---------|-------------|
/// | `Command` | An error returned by the command itself, passed through verbatim |
/// | `Fault` | A panic inside the command, caught at the session boundary |
/// | `DeadlineExceeded` | The request timeout elapsed first |
/// | `Cancelled` | The caller cancelled the call |
/// | `Transport` | The connection to the server failed |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamError {
    /// Error raised intentionally by the command
    #[error("{message}")]
    Command {
        /// The command's error message, unmodified
        message: String,
    },

    /// Unrecovered fault inside the command
    #[error("uncaught vtctl panic: {message}")]
    Fault {
        /// The panic message
        message: String,
    },

    /// Timeout elapsed before the command finished
    #[error("deadline exceeded: command did not finish within {timeout_ms}ms")]
    DeadlineExceeded {
        /// The request timeout, in milliseconds
        timeout_ms: u64,
    },

    /// Caller cancelled the call
    #[error("context canceled")]
    Cancelled,

    /// Transport failure between client and server
    #[error("transport error: {reason}")]
    Transport {
        /// What went wrong
        reason: String,
    },
}

impl StreamError {
    /// Build a command error from anything displayable.
    pub fn command(message: impl ToString) -> Self {
        StreamError::Command {
            message: message.to_string(),
        }
    }

    /// Build a transport error from anything displayable.
    pub fn transport(reason: impl ToString) -> Self {
        StreamError::Transport {
            reason: reason.to_string(),
        }
    }

    /// True for errors returned by the command itself.
    pub fn is_command(&self) -> bool {
        matches!(self, StreamError::Command { .. })
    }

    /// True for caught panics.
    pub fn is_fault(&self) -> bool {
        matches!(self, StreamError::Fault { .. })
    }

    /// True when the request timeout elapsed.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, StreamError::DeadlineExceeded { .. })
    }

    /// True when the caller cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }
}

impl StreamError {
    /// Map a finished context to the matching stream error.
    pub fn from_context(err: ContextError, timeout_ms: u64) -> Self {
        match err {
            ContextError::Cancelled => StreamError::Cancelled,
            ContextError::DeadlineExceeded => StreamError::DeadlineExceeded { timeout_ms },
        }
    }
}
