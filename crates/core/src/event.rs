//! Log events
//!
//! Commands report progress and results as a stream of [`Event`]s. Console
//! events are raw printed output; leveled events render in glog style.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational message
    Info,
    /// Something unexpected that did not stop the command
    Warning,
    /// A failure reported by the command
    Error,
    /// Raw command output, printed as-is
    Console,
}

impl Level {
    /// Single-letter glog prefix. Console output has none.
    pub fn prefix(&self) -> Option<char> {
        match self {
            Level::Info => Some('I'),
            Level::Warning => Some('W'),
            Level::Error => Some('E'),
            Level::Console => None,
        }
    }
}

/// One timestamped record emitted by a running command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// When the event was emitted
    pub time: DateTime<Utc>,
    /// Severity
    pub level: Level,
    /// Source file that emitted the event (empty for console output)
    #[serde(default)]
    pub file: String,
    /// Source line that emitted the event (0 for console output)
    #[serde(default)]
    pub line: u32,
    /// Message text
    pub value: String,
}

impl Event {
    /// Create a leveled event stamped with the current time.
    pub fn new(level: Level, file: impl Into<String>, line: u32, value: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            file: file.into(),
            line,
            value: value.into(),
        }
    }

    /// Create a console event carrying raw output.
    pub fn console(value: impl Into<String>) -> Self {
        Self::new(Level::Console, "", 0, value)
    }
}

/// Render an event the way it is shown to a user.
///
/// Console events are returned verbatim. Leveled events become
/// `I0102 15:04:05.000000 file.rs:42] message`.
pub fn event_string(event: &Event) -> String {
    match event.level.prefix() {
        None => event.value.clone(),
        Some(prefix) => format!(
            "{}{} {}:{}] {}",
            prefix,
            event.time.format("%m%d %H:%M:%S%.6f"),
            event.file,
            event.line,
            event.value
        ),
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&event_string(self))
    }
}
