//! Core types and traits for vtctl
//!
//! This crate defines the foundational types used throughout the system:
//! - Tablet, TabletAlias, TabletType: Tablet records held by the topology
//! - Event, Level: Log events streamed back from a running command
//! - Logger: Sink that commands write their events to
//! - Context: Cancellation and deadline carried by every call
//! - StreamError: Terminal error of a command stream

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod event;
pub mod logger;
pub mod tablet;

pub use context::{Context, ContextError};
pub use error::{StreamError, PANIC_MARKER};
pub use event::{event_string, Event, Level};
pub use logger::{Logger, LoggerClosed, MemoryLogger};
pub use tablet::{AliasParseError, Tablet, TabletAlias, TabletType, TabletTypeParseError};
