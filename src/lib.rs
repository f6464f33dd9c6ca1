//! vtctl - streaming command execution against a tablet topology
//!
//! A client submits a command line and a timeout; the server runs the
//! command against the topology store and streams its log lines back. The
//! stream ends in exactly one terminal signal: a clean end, a command error,
//! a fault (the command panicked), a deadline, or cancellation.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vtctl::{event_string, Context, Executor, LocalClient, MemoryTopo, VtctlClient, VtctlServer};
//!
//! let topo = Arc::new(MemoryTopo::new(&["cell1"]));
//! let server = Arc::new(VtctlServer::new(Executor::new(topo)));
//! let client = LocalClient::new(server);
//!
//! let mut stream = client
//!     .execute_vtctl_command(&Context::background(), vec!["ListAllTablets".into()], Duration::from_secs(30))
//!     .await?;
//! while let Some(event) = stream.recv().await? {
//!     print!("{}", event_string(&event));
//! }
//! ```
//!
//! # Crates
//!
//! - `vtctl-core` - tablets, events, [`Context`], [`StreamError`]
//! - `vtctl-topo` - the [`TabletStore`] interface and [`MemoryTopo`]
//! - `vtctl-executor` - command parsing and dispatch
//! - `vtctl-server` - streaming sessions and the TCP listener
//! - `vtctl-client` - [`VtctlClient`] transports and the conformance suite

pub use vtctl_client::{
    conformance, connect, ClientConfig, EventStream, LocalClient, Protocol, TcpClient,
    VtctlClient,
};
pub use vtctl_core::{
    event_string, Context, ContextError, Event, Level, Logger, MemoryLogger, StreamError, Tablet,
    TabletAlias, TabletType,
};
pub use vtctl_executor::{Command, Executor};
pub use vtctl_server::{
    serve, wire, CommandRequest, ServerConfig, SessionState, SessionStream, VtctlServer,
};
pub use vtctl_topo::{MemoryTopo, TabletStore, TopoError};
