//! TCP transport speaking the JSON-lines protocol of `vtctl_server::wire`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::debug;
use vtctl_core::{Context, Event, StreamError};
use vtctl_server::wire::{read_frame, write_frame, Frame};
use vtctl_server::CommandRequest;

use crate::client::{timeout_millis, EventSource, EventStream, VtctlClient};

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client opening one TCP connection per call.
#[derive(Debug, Clone)]
pub struct TcpClient {
    addr: String,
    connect_timeout: Duration,
}

impl TcpClient {
    /// Create a client for the server at `addr` (`host:port`).
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// The server address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn connect(&self, ctx: &Context) -> Result<TcpStream, StreamError> {
        tokio::select! {
            biased;
            _ = ctx.token().cancelled() => Err(StreamError::Cancelled),
            connected = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr)) => {
                match connected {
                    Ok(Ok(stream)) => Ok(stream),
                    Ok(Err(e)) => Err(StreamError::transport(format!(
                        "failed to connect to {}: {}",
                        self.addr, e
                    ))),
                    Err(_) => Err(StreamError::transport(format!(
                        "timed out connecting to {}",
                        self.addr
                    ))),
                }
            }
        }
    }
}

#[async_trait]
impl VtctlClient for TcpClient {
    async fn execute_vtctl_command(
        &self,
        ctx: &Context,
        args: Vec<String>,
        timeout: Duration,
    ) -> Result<EventStream, StreamError> {
        let call_ctx = ctx.with_timeout(timeout);
        let stream = self.connect(&call_ctx).await?;
        stream.set_nodelay(true).map_err(StreamError::transport)?;
        debug!(addr = %self.addr, args = ?args, "vtctl call");

        let (read, mut write) = stream.into_split();
        write_frame(&mut write, &CommandRequest::new(args, timeout)).await?;

        let source = RemoteSource {
            read: BufReader::new(read),
            _write: write,
        };
        Ok(EventStream::new(
            Box::new(source),
            call_ctx,
            timeout_millis(timeout),
        ))
    }
}

/// Reads frames off one connection.
///
/// The write half stays open for the whole call: the server treats the
/// client closing its side as cancellation.
struct RemoteSource {
    read: BufReader<OwnedReadHalf>,
    _write: OwnedWriteHalf,
}

#[async_trait]
impl EventSource for RemoteSource {
    async fn next(&mut self) -> Result<Option<Event>, StreamError> {
        match read_frame::<_, Frame>(&mut self.read).await? {
            Some(Frame::Event { event }) => Ok(Some(event)),
            Some(Frame::Eof) => Ok(None),
            Some(Frame::Error { error }) => Err(error),
            None => Err(StreamError::transport(
                "connection closed before end of stream",
            )),
        }
    }
}
