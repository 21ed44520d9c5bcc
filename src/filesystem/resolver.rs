use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use super::{FsTree, NodeId};

/// Leading segment that restarts the walk at the root
pub const HOME_SEGMENT: &str = "~";
pub const CURRENT_SEGMENT: &str = ".";
pub const PARENT_SEGMENT: &str = "..";

/// Walks every segment of `path`, the last one included, to an existing node.
///
/// The walk starts at `current`, or at the root when the path starts with `~`.
/// Nothing is mutated; a failed walk discards whatever it had reached so far.
pub fn resolve_node(tree: &FsTree, current: NodeId, path: &str) -> Result<NodeId, ResolveError> {
    let segments = split(path);
    let node = walk(tree, current, &segments)?;
    debug!("Resolved '{}' to {}", path, node);
    Ok(node)
}

/// Walks all but the last segment of `path` and hands that last segment back
/// unresolved, as a name to create or look up under the directory reached.
pub fn resolve_entry(
    tree: &FsTree,
    current: NodeId,
    path: &str,
) -> Result<(NodeId, String), ResolveError> {
    let segments = split(path);
    let (leaf, intermediate) = segments
        .split_last()
        .map(|(leaf, rest)| (*leaf, rest))
        .unwrap_or_default();

    let parent = if intermediate.is_empty() && leaf == HOME_SEGMENT {
        tree.root()
    } else {
        walk(tree, current, intermediate)?
    };
    let node = tree.node(parent).context(NotFoundSnafu { segment: leaf })?;
    ensure!(
        node.is_directory(),
        NotADirectorySnafu {
            segment: node.name()
        }
    );

    debug!("Resolved '{}' to entry '{}' under {}", path, leaf, parent);
    Ok((parent, leaf.to_string()))
}

fn split(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').collect();
    // `a/` names the same thing as `a`
    while segments.len() > 1 && segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

fn walk(tree: &FsTree, current: NodeId, segments: &[&str]) -> Result<NodeId, ResolveError> {
    let (mut position, rest) = match segments.split_first() {
        Some((&HOME_SEGMENT, rest)) => (tree.root(), rest),
        _ => (current, segments),
    };
    for segment in rest {
        position = step(tree, position, segment)?;
    }
    Ok(position)
}

/// Moves one segment from `from`, which has to be a directory
fn step(tree: &FsTree, from: NodeId, segment: &str) -> Result<NodeId, ResolveError> {
    let node = tree.node(from).context(NotFoundSnafu { segment })?;
    if !node.is_directory() {
        return NotADirectorySnafu {
            segment: node.name(),
        }
        .fail();
    }

    match segment {
        CURRENT_SEGMENT => Ok(from),
        // the root has no parent, so `..` stays put there
        PARENT_SEGMENT => Ok(node.parent().unwrap_or(from)),
        name => tree
            .find_child(from, name)
            .context(NotFoundSnafu { segment: name }),
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ResolveError {
    #[snafu(display("No such directory: '{}'", segment))]
    NotFound { segment: String },
    #[snafu(display("'{}' is not a directory", segment))]
    NotADirectory { segment: String },
}
