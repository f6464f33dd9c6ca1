//! Streaming sessions.
//!
//! A [`StreamingSession`] owns one command execution for its whole life:
//!
//! ```text
//! Idle -> Running -> { Clean | CommandError | Fault | DeadlineExceeded | Cancelled }
//! ```
//!
//! The command runs on the blocking pool under the fault boundary. Its events
//! go through a bounded channel to the [`SessionStream`] in the order they
//! were produced. A watchdog task ends the session at the request deadline,
//! or as soon as the caller's context is cancelled, and cancels the session
//! context so the command stops at its next check.
//!
//! Terminal states are sticky: whoever reaches one first (the command, the
//! watchdog, or the consumer noticing cancellation) decides the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vtctl_core::{Context, ContextError, Event, Logger, LoggerClosed, StreamError};
use vtctl_executor::Executor;

use crate::recover::run_supervised;

/// One command execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Command name followed by its arguments
    pub args: Vec<String>,
    /// Upper bound on execution wall time, in milliseconds
    pub timeout_ms: u64,
}

impl CommandRequest {
    /// Create a request.
    pub fn new(args: Vec<String>, timeout: Duration) -> Self {
        Self {
            args,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// The timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, command not started yet
    Idle,
    /// Command executing, events may be emitted
    Running,
    /// Command finished without error
    Clean,
    /// Command returned an error
    CommandError,
    /// Command panicked
    Fault,
    /// Request timeout elapsed first
    DeadlineExceeded,
    /// Caller cancelled first
    Cancelled,
}

impl SessionState {
    /// True for every state a session ends in.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Idle | SessionState::Running)
    }

    /// True when the command itself reached the end (as opposed to being
    /// stopped from outside). Events it produced are all still delivered.
    fn is_completed(&self) -> bool {
        matches!(
            self,
            SessionState::Clean | SessionState::CommandError | SessionState::Fault
        )
    }

    fn from_outcome(outcome: &Result<(), StreamError>) -> Self {
        match outcome {
            Ok(()) => SessionState::Clean,
            Err(StreamError::Command { .. }) => SessionState::CommandError,
            Err(StreamError::Fault { .. }) => SessionState::Fault,
            Err(StreamError::DeadlineExceeded { .. }) => SessionState::DeadlineExceeded,
            // the caller is gone either way
            Err(StreamError::Cancelled) | Err(StreamError::Transport { .. }) => {
                SessionState::Cancelled
            }
        }
    }
}

struct Progress {
    state: SessionState,
    outcome: Option<Result<(), StreamError>>,
}

/// State shared by the worker, the watchdog and the consumer.
struct Shared {
    progress: Mutex<Progress>,
    started: Instant,
    command: String,
}

impl Shared {
    fn state(&self) -> SessionState {
        self.progress.lock().state
    }

    fn begin(&self) {
        let mut progress = self.progress.lock();
        if progress.state == SessionState::Idle {
            progress.state = SessionState::Running;
        }
    }

    /// Record the terminal outcome. Returns false if one was already set.
    fn finish(&self, outcome: Result<(), StreamError>) -> bool {
        let mut progress = self.progress.lock();
        if progress.state.is_terminal() {
            return false;
        }
        progress.state = SessionState::from_outcome(&outcome);
        info!(
            command = %self.command,
            state = ?progress.state,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "vtctl session finished"
        );
        progress.outcome = Some(outcome);
        true
    }

    fn outcome(&self) -> Result<(), StreamError> {
        self.progress
            .lock()
            .outcome
            .clone()
            .unwrap_or_else(|| {
                Err(StreamError::Fault {
                    message: "session ended without an outcome".into(),
                })
            })
    }
}

/// Logger that forwards events to the session channel.
///
/// Runs on a blocking-pool thread; each emit waits for channel capacity but
/// gives up as soon as the session context is cancelled.
struct ChannelLogger {
    tx: mpsc::Sender<Event>,
    ctx: Context,
    handle: Handle,
}

impl Logger for ChannelLogger {
    fn emit(&self, event: Event) -> Result<(), LoggerClosed> {
        self.handle.block_on(async {
            tokio::select! {
                biased;
                _ = self.ctx.token().cancelled() => Err(LoggerClosed),
                sent = self.tx.send(event) => sent.map_err(|_| LoggerClosed),
            }
        })
    }
}

/// Starts supervised command executions.
pub struct StreamingSession;

impl StreamingSession {
    /// Start running `request` and return the stream of its events.
    ///
    /// The session context derives from `ctx` with the request timeout
    /// applied, so cancelling `ctx` stops the session. Must be called from
    /// within a Tokio runtime.
    pub fn start(
        executor: Executor,
        request: CommandRequest,
        ctx: &Context,
        event_buffer: usize,
    ) -> SessionStream {
        let timeout_ms = request.timeout_ms;
        let session_ctx = ctx.with_timeout(request.timeout());
        let (tx, rx) = mpsc::channel(event_buffer.max(1));
        let shared = Arc::new(Shared {
            progress: Mutex::new(Progress {
                state: SessionState::Idle,
                outcome: None,
            }),
            started: Instant::now(),
            command: request.args.first().cloned().unwrap_or_default(),
        });
        let done = CancellationToken::new();

        info!(args = ?request.args, timeout_ms, "vtctl session started");

        spawn_watchdog(
            Arc::clone(&shared),
            session_ctx.clone(),
            done.clone(),
            timeout_ms,
        );

        let worker_shared = Arc::clone(&shared);
        let worker_ctx = session_ctx.clone();
        let handle = Handle::current();
        tokio::task::spawn_blocking(move || {
            let _done = done.drop_guard();
            worker_shared.begin();

            let logger = ChannelLogger {
                tx,
                ctx: worker_ctx.clone(),
                handle,
            };
            let result = run_supervised(|| executor.execute(&worker_ctx, &request.args, &logger));
            let outcome = match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) if e.is_interruption() => {
                    let cause = worker_ctx.err().unwrap_or(ContextError::Cancelled);
                    Err(StreamError::from_context(cause, timeout_ms))
                }
                Ok(Err(e)) => Err(StreamError::command(e)),
                Err(fault) => Err(fault),
            };
            worker_shared.finish(outcome);
            // the channel closes when `logger` drops, after the outcome is set
        });

        SessionStream {
            rx,
            ctx: session_ctx,
            shared,
            terminal: None,
            timeout_ms,
        }
    }
}

/// Ends the session at its deadline or on caller cancellation, unless the
/// command finishes first.
fn spawn_watchdog(shared: Arc<Shared>, ctx: Context, done: CancellationToken, timeout_ms: u64) {
    tokio::spawn(async move {
        let deadline = ctx.deadline();
        tokio::select! {
            biased;
            _ = done.cancelled() => {}
            _ = ctx.token().cancelled() => {
                if shared.finish(Err(StreamError::Cancelled)) {
                    warn!(command = %shared.command, "vtctl session cancelled by caller");
                }
            }
            _ = sleep_until(deadline) => {
                if shared.finish(Err(StreamError::DeadlineExceeded { timeout_ms })) {
                    warn!(command = %shared.command, timeout_ms, "vtctl session deadline exceeded");
                }
                ctx.cancel();
            }
        }
    });
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

/// Consumer side of a session.
///
/// [`recv`](SessionStream::recv) yields events in production order, then
/// `Ok(None)` for a clean end or the terminal error. Once terminal, every
/// further call returns the same signal. Dropping the stream cancels the
/// session.
pub struct SessionStream {
    rx: mpsc::Receiver<Event>,
    ctx: Context,
    shared: Arc<Shared>,
    terminal: Option<Result<(), StreamError>>,
    timeout_ms: u64,
}

impl SessionStream {
    /// Wait for the next event.
    ///
    /// Returns `Ok(Some(event))` for a line, `Ok(None)` at a clean end of
    /// stream, or the terminal error.
    pub async fn recv(&mut self) -> Result<Option<Event>, StreamError> {
        if let Some(terminal) = &self.terminal {
            return terminal.clone().map(|()| None);
        }

        let state = self.shared.state();
        if state.is_terminal() && !state.is_completed() {
            return self.terminate();
        }

        let next = if state.is_completed() {
            self.rx.recv().await
        } else {
            tokio::select! {
                biased;
                _ = self.ctx.token().cancelled() => {
                    self.shared.finish(Err(StreamError::Cancelled));
                    return self.terminate();
                }
                next = self.rx.recv() => next,
            }
        };

        match next {
            Some(event) => {
                let state = self.shared.state();
                if state.is_terminal() && !state.is_completed() {
                    return self.terminate();
                }
                Ok(Some(event))
            }
            None => self.terminate(),
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

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// The request timeout, in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Cancel the session. The next `recv` returns `Cancelled` unless the
    /// session already reached a terminal state.
    pub fn cancel(&self) {
        self.ctx.cancel();
    }

    fn terminate(&mut self) -> Result<Option<Event>, StreamError> {
        let outcome = self.shared.outcome();
        self.terminal = Some(outcome.clone());
        self.rx.close();
        outcome.map(|()| None)
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.ctx.cancel();
    }
}
