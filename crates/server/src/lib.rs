//! # vtctl Server
//!
//! Serves command executions as ordered streams of log events.
//!
//! - [`StreamingSession`] - Runs one command under supervision: catches
//!   panics, enforces the request timeout, follows caller cancellation
//! - [`SessionStream`] - The consumer side of a session
//! - [`VtctlServer`] - Starts sessions against a shared [`Executor`](vtctl_executor::Executor)
//! - [`wire`] / [`listener`] - JSON-lines protocol over TCP
//!
//! Sessions run the executor on Tokio's blocking pool, so they must be
//! started from within a Tokio runtime.

#![warn(missing_docs)]

pub mod listener;
mod recover;
mod server;
mod session;
pub mod wire;

pub use listener::serve;
pub use server::{
    ServerConfig, VtctlServer, DEFAULT_EVENT_BUFFER, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_TIMEOUT_MS,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
pub use session::{CommandRequest, SessionState, SessionStream, StreamingSession};
