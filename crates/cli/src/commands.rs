//! Clap command trees for `vtctlclient` and `vtctld`.

use clap::{Arg, ArgAction, Command};

/// Build the `vtctlclient` command line.
///
/// Everything after the options is the vtctl command and its arguments,
/// passed through untouched.
pub fn build_client_cli() -> Command {
    Command::new("vtctlclient")
        .about("Run a vtctl command and stream its output")
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./vtctl.toml when present)"),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .help("vtctld address; selects the TCP transport"),
        )
        .arg(
            Arg::new("action_timeout")
                .long("action_timeout")
                .help("Timeout for the command, in milliseconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List the available commands and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("command")
                .help("Command name followed by its arguments")
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
}

/// Build the `vtctld` command line.
pub fn build_server_cli() -> Command {
    Command::new("vtctld")
        .about("Serve vtctl commands over TCP against an in-memory topology")
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./vtctl.toml when present)"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .help("Listen address, overrides [server] listen_addr"),
        )
        .arg(
            Arg::new("write-config")
                .long("write-config")
                .help("Write a commented default config to this path and exit"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_passes_command_through() {
        let matches = build_client_cli()
            .try_get_matches_from([
                "vtctlclient",
                "--server",
                "localhost:15999",
                "ListAllTablets",
                "--keyspace",
                "ks",
                "cell1",
            ])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("server").map(String::as_str),
            Some("localhost:15999")
        );
        let command: Vec<&String> = matches.get_many::<String>("command").unwrap().collect();
        assert_eq!(command, ["ListAllTablets", "--keyspace", "ks", "cell1"]);
    }

    #[test]
    fn test_client_timeout_must_be_numeric() {
        assert!(build_client_cli()
            .try_get_matches_from(["vtctlclient", "--action_timeout", "soon", "Panic"])
            .is_err());
    }

    #[test]
    fn test_server_listen_override() {
        let matches = build_server_cli()
            .try_get_matches_from(["vtctld", "--listen", "0.0.0.0:15999"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("listen").map(String::as_str),
            Some("0.0.0.0:15999")
        );
    }

    #[test]
    fn test_trees_are_well_formed() {
        build_client_cli().debug_assert();
        build_server_cli().debug_assert();
    }
}
