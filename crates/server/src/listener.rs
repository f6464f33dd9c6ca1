//! TCP transport: accept loop and per-connection call handling.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vtctl_core::Context;

use crate::session::CommandRequest;
use crate::wire::{read_frame, write_frame, Frame, WireError};
use crate::VtctlServer;

/// Accept connections until `shutdown` is cancelled.
///
/// Each connection is served on its own task. Shutting down stops
/// accepting and cancels the calls still in flight.
pub async fn serve(
    listener: TcpListener,
    server: Arc<VtctlServer>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let local = listener.local_addr()?;
    info!(addr = %local, "vtctl server listening");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(addr = %local, "vtctl server shutting down");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let server = Arc::clone(&server);
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, server, shutdown).await {
                            warn!(peer = %peer, "vtctl connection error: {e}");
                        }
                    });
                }
                Err(e) => warn!("accept error: {e}"),
            },
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    server: Arc<VtctlServer>,
    shutdown: CancellationToken,
) -> Result<(), WireError> {
    let (read, mut write) = stream.into_split();
    let mut read = BufReader::new(read);

    let request: CommandRequest = tokio::select! {
        _ = shutdown.cancelled() => return Ok(()),
        _ = tokio::time::sleep(server.request_timeout()) => {
            debug!(peer = %peer, "vtctl client sent no request in time");
            return Ok(());
        }
        line = read_frame(&mut read) => match line? {
            Some(request) => request,
            None => return Ok(()),
        },
    };
    debug!(peer = %peer, args = ?request.args, "vtctl request");

    let ctx = Context::background();
    let mut stream = match server.execute(&ctx, request) {
        Ok(stream) => stream,
        Err(error) => {
            write_frame(&mut write, &Frame::Error { error }).await?;
            write.shutdown().await?;
            return Ok(());
        }
    };

    let mut probe = [0u8; 64];
    let mut peer_open = true;
    let mut shutting_down = false;
    loop {
        tokio::select! {
            probed = read.read(&mut probe), if peer_open => {
                // Nothing is expected after the request; EOF or an error means
                // the client went away.
                if matches!(probed, Ok(0) | Err(_)) {
                    debug!(peer = %peer, "vtctl client disconnected");
                    peer_open = false;
                    ctx.cancel();
                }
            }
            _ = shutdown.cancelled(), if !shutting_down => {
                shutting_down = true;
                ctx.cancel();
            }
            next = stream.recv() => {
                let frame = match next {
                    Ok(Some(event)) => Frame::Event { event },
                    Ok(None) => Frame::Eof,
                    Err(error) => Frame::Error { error },
                };
                let terminal = frame.is_terminal();
                if peer_open {
                    write_frame(&mut write, &frame).await?;
                }
                if terminal {
                    break;
                }
            }
        }
    }

    if peer_open {
        write.shutdown().await?;
    }
    Ok(())
}
