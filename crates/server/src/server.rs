//! The vtctl server: admission of command requests into sessions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vtctl_core::{Context, StreamError};
use vtctl_executor::{Error, Executor};

use crate::session::{CommandRequest, SessionStream, StreamingSession};

/// Default cap on a single request's timeout: one hour.
pub const DEFAULT_MAX_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Default number of events buffered between a command and its reader.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Default time a TCP client has to send its request line.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default TCP listen address for `vtctld`.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:15999";

/// Server tuning.
///
/// Loaded from the `[server]` table of `vtctl.toml`; every field has a
/// default so an empty table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the TCP listener binds
    pub listen_addr: String,
    /// Requests asking for a longer timeout are clamped to this
    pub max_timeout_ms: u64,
    /// Channel capacity per session
    pub event_buffer: usize,
    /// Connections that send no request line within this are dropped
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_timeout_ms: DEFAULT_MAX_TIMEOUT_MS,
            event_buffer: DEFAULT_EVENT_BUFFER,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Serves vtctl command requests.
///
/// One server is shared by every connection; each request gets its own
/// [`StreamingSession`], so a failing or panicking command affects only the
/// stream it runs on.
pub struct VtctlServer {
    executor: Executor,
    config: ServerConfig,
    sessions: AtomicU64,
}

impl VtctlServer {
    /// Create a server with the default configuration.
    pub fn new(executor: Executor) -> Self {
        Self::with_config(executor, ServerConfig::default())
    }

    /// Create a server with an explicit configuration.
    pub fn with_config(executor: Executor, config: ServerConfig) -> Self {
        Self {
            executor,
            config,
            sessions: AtomicU64::new(0),
        }
    }

    /// Start executing a command and return its event stream.
    ///
    /// The request is rejected up front only when it names no command;
    /// every other failure arrives as the stream's terminal error. Must be
    /// called within a Tokio runtime.
    pub fn execute(
        &self,
        ctx: &Context,
        mut request: CommandRequest,
    ) -> Result<SessionStream, StreamError> {
        if request.args.is_empty() {
            return Err(StreamError::command(Error::EmptyCommand));
        }
        if request.timeout_ms > self.config.max_timeout_ms {
            debug!(
                requested_ms = request.timeout_ms,
                max_ms = self.config.max_timeout_ms,
                "clamping request timeout"
            );
            request.timeout_ms = self.config.max_timeout_ms;
        }

        self.sessions.fetch_add(1, Ordering::Relaxed);
        Ok(StreamingSession::start(
            self.executor.clone(),
            request,
            ctx,
            self.config.event_buffer,
        ))
    }

    /// The executor requests run on.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// The active configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// How long a TCP client may take to send its request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    /// The longest timeout a request may use.
    pub fn max_timeout(&self) -> Duration {
        Duration::from_millis(self.config.max_timeout_ms)
    }

    /// Number of sessions started since the server was created.
    pub fn sessions_started(&self) -> u64 {
        self.sessions.load(Ordering::Relaxed)
    }
}
