//! # vtctl Client
//!
//! The caller side of a streaming vtctl call.
//!
//! - [`VtctlClient`] - Starts a command and returns its [`EventStream`]
//! - [`LocalClient`] - In-process transport over a [`VtctlServer`](vtctl_server::VtctlServer)
//! - [`TcpClient`] - JSON lines over TCP
//! - [`connect`] - Builds the client a [`ClientConfig`] selects
//! - [`conformance`] - The suite every transport runs in its tests
//!
//! ```ignore
//! let client = connect(&ClientConfig::tcp("127.0.0.1:15999"), None)?;
//! let mut stream = client
//!     .execute_vtctl_command(&Context::background(), args, Duration::from_secs(30))
//!     .await?;
//! while let Some(event) = stream.recv().await? {
//!     print!("{}", event_string(&event));
//! }
//! ```

#![warn(missing_docs)]

mod client;
pub mod config;
pub mod conformance;
mod local;
mod tcp;

pub use client::{EventSource, EventStream, VtctlClient};
pub use config::{connect, ClientConfig, ConfigError, Protocol, ProtocolKind};
pub use local::LocalClient;
pub use tcp::{TcpClient, DEFAULT_CONNECT_TIMEOUT};
