//! Command enum and command-line parsing.
//!
//! A command line arrives as a list of strings: the command name followed
//! by its flags and positional arguments. [`Command::parse`] turns it into a
//! typed [`Command`] using one clap command tree, so every command gets the
//! same flag syntax (`--keyspace ks` or `--keyspace=ks`).

use clap::{Arg, ArgMatches, ColorChoice};
use vtctl_core::{TabletAlias, TabletType};

use crate::{Error, Result};

/// A parsed administrative command.
///
/// # Example
///
/// ```ignore
/// let args = vec!["ListAllTablets".to_string(), "cell1".to_string()];
/// let cmd = Command::parse(&args)?;
/// assert_eq!(cmd.name(), "ListAllTablets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every tablet in the given cells (all cells when empty).
    ListAllTablets {
        /// Cells to list, in output order
        cells: Vec<String>,
        /// Only tablets of this keyspace
        keyspace: Option<String>,
        /// Only tablets of this type
        tablet_type: Option<TabletType>,
    },

    /// List the given tablets, in argument order.
    ListTablets {
        /// Tablets to list
        aliases: Vec<TabletAlias>,
    },

    /// Print one tablet record as JSON.
    GetTablet {
        /// Tablet to print
        alias: TabletAlias,
    },

    /// Panic on purpose. Exercises fault isolation.
    Panic,
}

/// Name, argument synopsis and description of every command.
pub(crate) const COMMANDS: &[(&str, &str, &str)] = &[
    (
        "ListAllTablets",
        "[--keyspace=''] [--tablet_type=<primary,replica,rdonly,spare>] [<cell_name1>,<cell_name2>,...]",
        "Lists all tablets in an awk-friendly way.",
    ),
    (
        "ListTablets",
        "<tablet alias> ...",
        "Lists specified tablets in an awk-friendly way.",
    ),
    (
        "GetTablet",
        "<tablet alias>",
        "Outputs a JSON structure that contains information about the tablet.",
    ),
    ("Panic", "", "Panics on purpose. Used to test fault isolation."),
];

fn command_tree() -> clap::Command {
    clap::Command::new("vtctl")
        .no_binary_name(true)
        .subcommand_required(true)
        .disable_help_subcommand(true)
        .color(ColorChoice::Never)
        .subcommand(
            clap::Command::new("ListAllTablets")
                .arg(Arg::new("keyspace").long("keyspace"))
                .arg(
                    Arg::new("tablet_type")
                        .long("tablet_type")
                        .value_parser(|s: &str| s.parse::<TabletType>()),
                )
                .arg(Arg::new("cells")),
        )
        .subcommand(
            clap::Command::new("ListTablets").arg(
                Arg::new("aliases")
                    .required(true)
                    .num_args(1..)
                    .value_parser(|s: &str| s.parse::<TabletAlias>()),
            ),
        )
        .subcommand(
            clap::Command::new("GetTablet").arg(
                Arg::new("alias")
                    .required(true)
                    .value_parser(|s: &str| s.parse::<TabletAlias>()),
            ),
        )
        .subcommand(clap::Command::new("Panic"))
}

impl Command {
    /// Parse a command line (`args[0]` is the command name).
    ///
    /// # Errors
    ///
    /// `EmptyCommand` for an empty line, `UnknownCommand` for an unrecognized
    /// name, `InvalidArgs` when the command's own flags or arguments are wrong.
    pub fn parse(args: &[String]) -> Result<Command> {
        let name = args.first().ok_or(Error::EmptyCommand)?;
        if !COMMANDS.iter().any(|(known, _, _)| known == name) {
            return Err(Error::UnknownCommand {
                command: name.clone(),
            });
        }

        let matches = command_tree()
            .try_get_matches_from(args)
            .map_err(|e| Error::InvalidArgs {
                command: name.clone(),
                reason: e.to_string().trim_end().to_string(),
            })?;

        match matches.subcommand() {
            Some(("ListAllTablets", sub)) => Ok(Command::ListAllTablets {
                cells: split_cells(sub),
                keyspace: sub.get_one::<String>("keyspace").cloned(),
                tablet_type: sub.get_one::<TabletType>("tablet_type").copied(),
            }),
            Some(("ListTablets", sub)) => Ok(Command::ListTablets {
                aliases: sub
                    .get_many::<TabletAlias>("aliases")
                    .map(|v| v.cloned().collect())
                    .unwrap_or_default(),
            }),
            Some(("GetTablet", sub)) => {
                let alias = sub
                    .get_one::<TabletAlias>("alias")
                    .cloned()
                    .ok_or_else(|| Error::InvalidArgs {
                        command: name.clone(),
                        reason: "the <tablet alias> argument is required".into(),
                    })?;
                Ok(Command::GetTablet { alias })
            }
            Some(("Panic", _)) => Ok(Command::Panic),
            _ => Err(Error::UnknownCommand {
                command: name.clone(),
            }),
        }
    }

    /// The command's name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListAllTablets { .. } => "ListAllTablets",
            Command::ListTablets { .. } => "ListTablets",
            Command::GetTablet { .. } => "GetTablet",
            Command::Panic => "Panic",
        }
    }
}

fn split_cells(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_one::<String>("cells")
        .map(|cells| {
            cells
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
