//! Process-level plumbing: logging setup and printing a call's stream.

use std::io::Write;
use std::time::Duration;

use tracing::debug;
use vtctl_client::VtctlClient;
use vtctl_core::{event_string, Context, Event, Level};

/// Initialize `tracing` from `RUST_LOG`, defaulting to `info`. Logs go to
/// stderr so stdout carries only command output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run one command through `client`, printing its events as they arrive.
///
/// Console output goes to stdout verbatim, leveled log lines to stderr.
/// Ctrl-C cancels the call. Returns the process exit code.
pub async fn run_command(client: &dyn VtctlClient, args: Vec<String>, timeout: Duration) -> i32 {
    let ctx = Context::background();
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted, cancelling call");
            interrupt.cancel();
        }
    });

    let mut stream = match client.execute_vtctl_command(&ctx, args, timeout).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let stdout = std::io::stdout();
    loop {
        match stream.recv().await {
            Ok(Some(event)) => print_event(&mut stdout.lock(), &event),
            Ok(None) => return 0,
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        }
    }
}

fn print_event(out: &mut impl Write, event: &Event) {
    let line = event_string(event);
    if event.level == Level::Console {
        // ignore a closed stdout, e.g. when piped into `head`
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    } else {
        eprint!("{}", line);
        if !line.ends_with('\n') {
            eprintln!();
        }
    }
}
