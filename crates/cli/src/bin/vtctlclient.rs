//! vtctlclient: run one vtctl command and stream its output.
//!
//! ```text
//! vtctlclient [--config vtctl.toml] [--server host:port] [--action_timeout ms] <command> [args...]
//! ```
//!
//! Without `--server` the transport comes from the `[client]` config
//! section; `in_process` runs the command against the configured topology.

use std::path::Path;
use std::process;
use std::time::Duration;

use vtctl_cli::commands::build_client_cli;
use vtctl_cli::run::{init_tracing, run_command};
use vtctl_cli::VtctlConfig;
use vtctl_client::{connect, ClientConfig, Protocol};
use vtctl_executor::Executor;

#[tokio::main]
async fn main() {
    init_tracing();
    let matches = build_client_cli().get_matches();

    if matches.get_flag("list") {
        print!("{}", Executor::usage());
        return;
    }

    let mut config = match VtctlConfig::load(matches.get_one::<String>("config").map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if let Some(addr) = matches.get_one::<String>("server") {
        config.client = ClientConfig {
            timeout_ms: config.client.timeout_ms,
            connect_timeout_ms: config.client.connect_timeout_ms,
            ..ClientConfig::tcp(addr.clone())
        };
    }
    if let Some(ms) = matches.get_one::<u64>("action_timeout") {
        config.client.timeout_ms = *ms;
    }

    let args: Vec<String> = matches
        .get_many::<String>("command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if args.is_empty() {
        eprintln!("no command specified\n\n{}", Executor::usage());
        process::exit(1);
    }

    let local = match config.client.protocol() {
        Ok(Protocol::InProcess) => match config.build_server() {
            Ok(server) => Some(server),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        _ => None,
    };
    let client = match connect(&config.client, local) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let timeout = Duration::from_millis(config.client.timeout_ms);
    let code = run_command(client.as_ref(), args, timeout).await;
    process::exit(code);
}
