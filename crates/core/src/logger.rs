//! Event sinks
//!
//! Commands never print directly. They write [`Event`]s to a [`Logger`],
//! and whoever runs the command decides where the events go: a stream back
//! to a remote caller, or an in-memory buffer.

use parking_lot::Mutex;
use std::panic::Location;

use crate::event::{Event, Level};

/// Returned by [`Logger::emit`] once nobody is listening any more.
///
/// Commands treat this as a signal to stop: the call was cancelled or its
/// deadline passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("log stream closed")]
pub struct LoggerClosed;

/// Destination for command output.
pub trait Logger: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: Event) -> Result<(), LoggerClosed>;

    /// Print raw output as a console event.
    fn print(&self, value: String) -> Result<(), LoggerClosed> {
        self.emit(Event::console(value))
    }

    /// Log an informational message tagged with the caller's location.
    #[track_caller]
    fn info(&self, value: String) -> Result<(), LoggerClosed> {
        self.emit(located(Level::Info, value, Location::caller()))
    }

    /// Log a warning tagged with the caller's location.
    #[track_caller]
    fn warning(&self, value: String) -> Result<(), LoggerClosed> {
        self.emit(located(Level::Warning, value, Location::caller()))
    }

    /// Log an error tagged with the caller's location.
    #[track_caller]
    fn error(&self, value: String) -> Result<(), LoggerClosed> {
        self.emit(located(Level::Error, value, Location::caller()))
    }
}

fn located(level: Level, value: String, location: &Location<'_>) -> Event {
    let file = location
        .file()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    Event::new(level, file, location.line(), value)
}

/// Logger that keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<Event>>,
}

impl MemoryLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events logged so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Take the events logged so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }

    /// All events rendered and concatenated.
    pub fn render(&self) -> String {
        self.events
            .lock()
            .iter()
            .map(crate::event::event_string)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn emit(&self, event: Event) -> Result<(), LoggerClosed> {
        self.events.lock().push(event);
        Ok(())
    }
}
