//! Tablet listing command handlers.

use std::sync::Arc;

use vtctl_core::{Context, Logger, Tablet, TabletAlias, TabletType};
use vtctl_topo::{TabletStore, TopoError};

use crate::format::format_tablet_line;
use crate::Result;

/// Handle ListAllTablets command.
///
/// Explicit cells are listed in the order given and a cell without tablets
/// fails the command. With no cells, every known cell is listed and empty
/// ones are skipped with a warning.
pub fn list_all_tablets(
    store: &Arc<dyn TabletStore>,
    ctx: &Context,
    logger: &dyn Logger,
    cells: Vec<String>,
    keyspace: Option<String>,
    tablet_type: Option<TabletType>,
) -> Result<()> {
    let explicit = !cells.is_empty();
    let cells = if explicit { cells } else { store.cells(ctx)? };

    for cell in cells {
        let tablets = match store.list_tablets(ctx, &cell) {
            Ok(tablets) => tablets,
            Err(TopoError::NoNode { .. }) if !explicit => {
                logger.warning(format!("skipping cell {cell}: no tablets\n"))?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let matching = tablets.iter().filter(|t| {
            keyspace.as_ref().map_or(true, |ks| &t.keyspace == ks)
                && tablet_type.map_or(true, |tt| t.tablet_type == tt)
        });
        for tablet in matching {
            print_tablet(ctx, logger, tablet)?;
        }
    }
    Ok(())
}

/// Handle ListTablets command.
pub fn list_tablets(
    store: &Arc<dyn TabletStore>,
    ctx: &Context,
    logger: &dyn Logger,
    aliases: Vec<TabletAlias>,
) -> Result<()> {
    for alias in aliases {
        let tablet = store.get_tablet(ctx, &alias)?;
        print_tablet(ctx, logger, &tablet)?;
    }
    Ok(())
}

/// Handle GetTablet command.
pub fn get_tablet(
    store: &Arc<dyn TabletStore>,
    ctx: &Context,
    logger: &dyn Logger,
    alias: TabletAlias,
) -> Result<()> {
    let tablet = store.get_tablet(ctx, &alias)?;
    let json = serde_json::to_string_pretty(&tablet)?;
    logger.print(format!("{}\n", json))?;
    Ok(())
}

fn print_tablet(ctx: &Context, logger: &dyn Logger, tablet: &Tablet) -> Result<()> {
    ctx.check()?;
    logger.print(format!("{}\n", format_tablet_line(tablet)))?;
    Ok(())
}
