//! In-memory directory tree and the path resolution that walks it.
//!
//! Nodes live in an arena owned by [`FsTree`] and are addressed by [`NodeId`]
//! handles, so the parent links used by `..` and `pwd` never own anything.
//! Paths are `/`-separated, may start with `~` for the root, and may contain
//! `.` and `..` segments.

mod resolver;
mod tree;

pub use resolver::{
    CURRENT_SEGMENT, HOME_SEGMENT, PARENT_SEGMENT, ResolveError, resolve_entry, resolve_node,
};
pub use tree::{FsTree, Node, NodeId, TreeError};
