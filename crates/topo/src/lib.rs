//! Tablet topology store
//!
//! The topology is the registry of tablet records, keyed by cell and uid.
//! Commands reach it only through the [`TabletStore`] trait; [`MemoryTopo`]
//! is the in-memory implementation used by `vtctld` and by tests.

#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod store;

pub use error::{TopoError, TopoResult};
pub use memory::MemoryTopo;
pub use store::TabletStore;
