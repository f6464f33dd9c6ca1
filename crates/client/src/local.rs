//! In-process transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use vtctl_core::{Context, Event, StreamError};
use vtctl_server::{CommandRequest, SessionStream, VtctlServer};

use crate::client::{timeout_millis, EventSource, EventStream, VtctlClient};

/// Client calling a [`VtctlServer`] in the same process.
#[derive(Clone)]
pub struct LocalClient {
    server: Arc<VtctlServer>,
}

impl LocalClient {
    /// Create a client over `server`.
    pub fn new(server: Arc<VtctlServer>) -> Self {
        Self { server }
    }
}

#[async_trait]
impl VtctlClient for LocalClient {
    async fn execute_vtctl_command(
        &self,
        ctx: &Context,
        args: Vec<String>,
        timeout: Duration,
    ) -> Result<EventStream, StreamError> {
        let call_ctx = ctx.with_timeout(timeout);
        let session = self
            .server
            .execute(&call_ctx, CommandRequest::new(args, timeout))?;
        Ok(EventStream::new(
            Box::new(LocalSource(session)),
            call_ctx,
            timeout_millis(timeout),
        ))
    }
}

struct LocalSource(SessionStream);

#[async_trait]
impl EventSource for LocalSource {
    async fn next(&mut self) -> Result<Option<Event>, StreamError> {
        self.0.recv().await
    }
}
