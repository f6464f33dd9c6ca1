//! Line-delimited JSON framing for the TCP transport.
//!
//! A connection carries exactly one call:
//! - Client sends one request line: `{"args": [...], "timeout_ms": N}`
//! - Server replies with zero or more `{"type": "event", "event": {...}}`
//! - Then exactly one terminal frame: `{"type": "eof"}` or
//!   `{"type": "error", "error": {"kind": ..., ...}}`
//!
//! Closing the connection early cancels the call.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use vtctl_core::{Event, StreamError};

/// Longest frame accepted from a peer.
pub const MAX_FRAME_LEN: usize = 1 << 20;

/// Server to client frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// One log line
    Event {
        /// The event
        event: Event,
    },
    /// The command failed
    Error {
        /// Why
        error: StreamError,
    },
    /// The command finished cleanly
    Eof,
}

impl Frame {
    /// True for `Error` and `Eof`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Frame::Event { .. })
    }
}

/// Framing failures.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Socket error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame was not valid JSON for the expected type
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame exceeded [`MAX_FRAME_LEN`]
    #[error("frame too long: {len} bytes")]
    TooLong {
        /// Bytes read before giving up
        len: usize,
    },
}

impl From<WireError> for StreamError {
    fn from(e: WireError) -> Self {
        StreamError::transport(e)
    }
}

/// Write one value as a JSON line and flush.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one JSON line. Returns `Ok(None)` at end of input.
///
/// At most `MAX_FRAME_LEN + 1` bytes are buffered; a longer line fails with
/// [`WireError::TooLong`] without being read to its end.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>, WireError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(MAX_FRAME_LEN as u64 + 1)
        .read_until(b'\n', &mut line)
        .await?;
    if n == 0 {
        return Ok(None);
    }
    if n > MAX_FRAME_LEN {
        return Err(WireError::TooLong { len: n });
    }
    Ok(Some(serde_json::from_slice(&line)?))
}
