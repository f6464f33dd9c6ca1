//! vtctld: serve vtctl commands over TCP.
//!
//! The topology is in memory, seeded from the config file. Ctrl-C stops
//! accepting connections and cancels calls in flight.

use std::path::Path;
use std::process;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use vtctl_cli::commands::build_server_cli;
use vtctl_cli::run::init_tracing;
use vtctl_cli::VtctlConfig;
use vtctl_server::serve;

#[tokio::main]
async fn main() {
    init_tracing();
    let matches = build_server_cli().get_matches();

    if let Some(path) = matches.get_one::<String>("write-config") {
        if let Err(e) = VtctlConfig::write_default_if_missing(Path::new(path)) {
            eprintln!("{}", e);
            process::exit(1);
        }
        return;
    }

    let mut config = match VtctlConfig::load(matches.get_one::<String>("config").map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if let Some(addr) = matches.get_one::<String>("listen") {
        config.server.listen_addr = addr.clone();
    }

    let server = match config.build_server() {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let addr = config.server.listen_addr.clone();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind to {addr}: {e}");
            process::exit(1);
        }
    };
    info!(tablets = config.tablets.len(), cells = ?config.cells, "topology seeded");

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.cancel();
        }
    });

    if let Err(e) = serve(listener, server, shutdown).await {
        error!("server error: {e}");
        process::exit(1);
    }
}
