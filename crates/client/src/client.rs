//! The client stub and its event stream.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use vtctl_core::{Context, Event, StreamError};

/// Executes vtctl commands against a server, whatever the transport.
///
/// Each call returns an [`EventStream`] of the command's log lines. Only a
/// request that cannot be started at all (e.g. the server is unreachable)
/// fails here; command failures arrive as the stream's terminal error.
#[async_trait]
pub trait VtctlClient: Send + Sync {
    /// Start `args` on the server with the given timeout.
    async fn execute_vtctl_command(
        &self,
        ctx: &Context,
        args: Vec<String>,
        timeout: Duration,
    ) -> Result<EventStream, StreamError>;
}

/// Transport-specific source of stream items.
///
/// Yields events, then `Ok(None)` or an error once. [`EventStream`] never
/// polls a source again after that.
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next item.
    async fn next(&mut self) -> Result<Option<Event>, StreamError>;
}

/// Ordered stream of a command's log events.
///
/// [`recv`](EventStream::recv) yields events, then `Ok(None)` for a clean
/// end or the terminal error; once terminal, every call returns the same
/// signal. The stream follows the caller's context: cancelling it ends the
/// stream with [`StreamError::Cancelled`] and no further events.
pub struct EventStream {
    source: Option<Box<dyn EventSource>>,
    ctx: Context,
    timeout_ms: u64,
    terminal: Option<Result<(), StreamError>>,
}

impl EventStream {
    /// Wrap a source. `ctx` bounds the stream; its deadline, if any, is
    /// reported as exceeding `timeout_ms`.
    pub fn new(source: Box<dyn EventSource>, ctx: Context, timeout_ms: u64) -> Self {
        Self {
            source: Some(source),
            ctx,
            timeout_ms,
            terminal: None,
        }
    }

    /// Wait for the next event.
    pub async fn recv(&mut self) -> Result<Option<Event>, StreamError> {
        if let Some(terminal) = &self.terminal {
            return terminal.clone().map(|()| None);
        }
        let Some(source) = self.source.as_mut() else {
            return self.finish(Err(StreamError::Cancelled));
        };

        let next = tokio::select! {
            biased;
            _ = self.ctx.token().cancelled() => Err(StreamError::Cancelled),
            _ = sleep_until(self.ctx.deadline()) => Err(StreamError::DeadlineExceeded {
                timeout_ms: self.timeout_ms,
            }),
            next = source.next() => next,
        };

        match next {
            Ok(Some(event)) => Ok(Some(event)),
            Ok(None) => self.finish(Ok(())),
            Err(e) => self.finish(Err(e)),
        }
    }

    /// Drain the stream into a vector, or return its terminal error.
    pub async fn collect(mut self) -> Result<Vec<Event>, StreamError> {
        let mut events = Vec::new();
        while let Some(event) = self.recv().await? {
            events.push(event);
        }
        Ok(events)
    }

    /// Stop the call. Pending and future events are discarded.
    pub fn cancel(&self) {
        self.ctx.cancel();
    }

    /// True once a terminal signal has been returned.
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    fn finish(&mut self, outcome: Result<(), StreamError>) -> Result<Option<Event>, StreamError> {
        // Dropping the source releases the transport and stops the command.
        self.source = None;
        self.terminal = Some(outcome.clone());
        outcome.map(|()| None)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.ctx.cancel();
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

pub(crate) fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
