//! Topology errors
//!
//! Message texts are relied on by callers matching substrings (for example
//! `node doesn't exist`), so they must stay stable.

use vtctl_core::ContextError;

/// Result type alias for topology operations
pub type TopoResult<T> = std::result::Result<T, TopoError>;

/// Errors returned by a [`TabletStore`](crate::TabletStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopoError {
    /// The node (cell, tablet) does not exist
    #[error("node doesn't exist: {node}")]
    NoNode {
        /// Path of the missing node
        node: String,
    },

    /// The node already exists
    #[error("node already exists: {node}")]
    NodeExists {
        /// Path of the existing node
        node: String,
    },

    /// The call was cancelled before it completed
    #[error("interrupted: {0}")]
    Interrupted(ContextError),
}

impl TopoError {
    /// True for [`TopoError::NoNode`].
    pub fn is_no_node(&self) -> bool {
        matches!(self, TopoError::NoNode { .. })
    }
}

impl From<ContextError> for TopoError {
    fn from(e: ContextError) -> Self {
        TopoError::Interrupted(e)
    }
}
