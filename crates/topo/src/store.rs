//! The topology store interface consumed by commands.

use vtctl_core::{Context, Tablet, TabletAlias};

use crate::TopoResult;

/// Registry of tablet records.
///
/// Implementations must allow concurrent readers and serialize writers.
/// Every method takes the caller's [`Context`] and returns
/// [`TopoError::Interrupted`](crate::TopoError::Interrupted) promptly once it
/// is cancelled or past its deadline.
pub trait TabletStore: Send + Sync {
    /// Register a new tablet. Fails with `NodeExists` if the alias is taken.
    fn create_tablet(&self, ctx: &Context, tablet: Tablet) -> TopoResult<()>;

    /// Remove a tablet. Fails with `NoNode` if the alias is not registered.
    fn delete_tablet(&self, ctx: &Context, alias: &TabletAlias) -> TopoResult<()>;

    /// Fetch one tablet. Fails with `NoNode` if the alias is not registered.
    fn get_tablet(&self, ctx: &Context, alias: &TabletAlias) -> TopoResult<Tablet>;

    /// All tablets of a cell, ordered by uid.
    ///
    /// Fails with `NoNode` when the cell has no tablets.
    fn list_tablets(&self, ctx: &Context, cell: &str) -> TopoResult<Vec<Tablet>>;

    /// Names of all known cells, sorted.
    fn cells(&self, ctx: &Context) -> TopoResult<Vec<String>>;
}
