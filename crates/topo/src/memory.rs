//! In-memory topology store.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;
use vtctl_core::{Context, Tablet, TabletAlias};

use crate::{TabletStore, TopoError, TopoResult};

/// Tablet registry held entirely in memory.
///
/// Cells must be registered up front (or with [`MemoryTopo::add_cell`]);
/// tablets can only be created in a known cell. Readers share a
/// `parking_lot::RwLock`, writers take it exclusively.
#[derive(Debug, Default)]
pub struct MemoryTopo {
    cells: RwLock<BTreeMap<String, BTreeMap<u32, Tablet>>>,
}

impl MemoryTopo {
    /// Create a store with the given cells and no tablets.
    pub fn new(cells: &[&str]) -> Self {
        let map = cells
            .iter()
            .map(|c| (c.to_string(), BTreeMap::new()))
            .collect();
        Self {
            cells: RwLock::new(map),
        }
    }

    /// Register a cell. Returns false if it was already known.
    pub fn add_cell(&self, cell: &str) -> bool {
        let mut cells = self.cells.write();
        if cells.contains_key(cell) {
            return false;
        }
        cells.insert(cell.to_string(), BTreeMap::new());
        true
    }

    /// Total number of tablets across all cells.
    pub fn tablet_count(&self) -> usize {
        self.cells.read().values().map(BTreeMap::len).sum()
    }
}

fn tablets_node(cell: &str) -> String {
    format!("{}/tablets", cell)
}

fn tablet_node(alias: &TabletAlias) -> String {
    format!("{}/tablets/{}", alias.cell, alias)
}

impl TabletStore for MemoryTopo {
    fn create_tablet(&self, ctx: &Context, tablet: Tablet) -> TopoResult<()> {
        ctx.check()?;
        let mut cells = self.cells.write();
        let cell = cells
            .get_mut(&tablet.alias.cell)
            .ok_or_else(|| TopoError::NoNode {
                node: tablet.alias.cell.clone(),
            })?;
        if cell.contains_key(&tablet.alias.uid) {
            return Err(TopoError::NodeExists {
                node: tablet_node(&tablet.alias),
            });
        }
        debug!(alias = %tablet.alias, "created tablet");
        cell.insert(tablet.alias.uid, tablet);
        Ok(())
    }

    fn delete_tablet(&self, ctx: &Context, alias: &TabletAlias) -> TopoResult<()> {
        ctx.check()?;
        let mut cells = self.cells.write();
        let removed = cells
            .get_mut(&alias.cell)
            .and_then(|cell| cell.remove(&alias.uid));
        match removed {
            Some(_) => {
                debug!(alias = %alias, "deleted tablet");
                Ok(())
            }
            None => Err(TopoError::NoNode {
                node: tablet_node(alias),
            }),
        }
    }

    fn get_tablet(&self, ctx: &Context, alias: &TabletAlias) -> TopoResult<Tablet> {
        ctx.check()?;
        self.cells
            .read()
            .get(&alias.cell)
            .and_then(|cell| cell.get(&alias.uid))
            .cloned()
            .ok_or_else(|| TopoError::NoNode {
                node: tablet_node(alias),
            })
    }

    fn list_tablets(&self, ctx: &Context, cell: &str) -> TopoResult<Vec<Tablet>> {
        ctx.check()?;
        let cells = self.cells.read();
        match cells.get(cell) {
            Some(tablets) if !tablets.is_empty() => Ok(tablets.values().cloned().collect()),
            _ => Err(TopoError::NoNode {
                node: tablets_node(cell),
            }),
        }
    }

    fn cells(&self, ctx: &Context) -> TopoResult<Vec<String>> {
        ctx.check()?;
        Ok(self.cells.read().keys().cloned().collect())
    }
}
