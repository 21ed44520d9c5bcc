use snafu::{OptionExt, ResultExt};
use tracing::{debug, info};

use crate::filesystem::{
    CURRENT_SEGMENT, FsTree, HOME_SEGMENT, NodeId, PARENT_SEGMENT, TreeError, resolve_entry,
    resolve_node,
};
use crate::navigator::CommandError;
use crate::navigator::command_error::*;

/// Leaf names that always refer to a directory that already exists
const RESERVED_NAMES: [&str; 2] = [CURRENT_SEGMENT, PARENT_SEGMENT];

/// Owns the tree and the current directory cursor.
///
/// The cursor only moves after a path has been fully resolved, so it always
/// points at a live directory.
#[derive(Debug, Clone)]
pub struct Session {
    tree: FsTree,
    current: NodeId,
}

impl Session {
    pub fn new(tree: FsTree) -> Self {
        let current = tree.root();
        Self { tree, current }
    }

    pub fn tree(&self) -> &FsTree {
        &self.tree
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    /// Moves the cursor; no path at all goes back to the root
    pub fn cd(&mut self, path: Option<&str>) -> Result<(), CommandError> {
        let Some(path) = path.filter(|path| !path.is_empty()) else {
            debug!("cd without a path, returning to root");
            self.current = self.tree.root();
            return Ok(());
        };

        let target =
            resolve_node(&self.tree, self.current, path).context(InvalidPathSnafu { path })?;

        let is_directory = self
            .tree
            .node(target)
            .is_some_and(|node| node.is_directory());
        if !is_directory {
            return NotADirectorySnafu { path }.fail();
        }

        debug!("cd '{}' moved cursor {} -> {}", path, self.current, target);
        self.current = target;
        Ok(())
    }

    /// Root-to-cursor names joined by `/`, with a trailing newline
    pub fn pwd(&self) -> String {
        let mut line = self.tree.path_names(self.current).join("/");
        line.push('\n');
        line
    }

    pub fn ls(&self) -> String {
        self.tree.render(self.current)
    }

    /// Creates one directory per path. Every path is attempted even if earlier ones fail.
    pub fn mkdir(&mut self, paths: &[String]) -> Vec<CommandError> {
        if paths.is_empty() {
            return vec![CommandError::MissingOperand {
                command: "mkdir".to_string(),
            }];
        }

        paths
            .iter()
            .filter_map(|path| self.make_directory(path).err())
            .collect()
    }

    /// Removes one empty directory per path. Every path is attempted even if earlier ones fail.
    pub fn rmdir(&mut self, paths: &[String]) -> Vec<CommandError> {
        if paths.is_empty() {
            return vec![CommandError::MissingOperand {
                command: "rmdir".to_string(),
            }];
        }

        paths
            .iter()
            .filter_map(|path| self.remove_directory(path).err())
            .collect()
    }

    fn make_directory(&mut self, path: &str) -> Result<NodeId, CommandError> {
        let (parent, name) =
            resolve_entry(&self.tree, self.current, path).context(MakeDirectorySnafu { path })?;

        // `~` only names the root on its own; deeper down it is an invalid name
        let is_root = path.trim_end_matches('/') == HOME_SEGMENT;
        if is_root || RESERVED_NAMES.contains(&name.as_str()) {
            return FileExistsSnafu { path }.fail();
        }

        match self.tree.add_directory(parent, &name) {
            Ok(id) => {
                info!("Created directory '{}'", path);
                Ok(id)
            }
            Err(TreeError::NameTaken { .. }) => FileExistsSnafu { path }.fail(),
            Err(error) => Err(error).context(InvalidDirectoryNameSnafu { path }),
        }
    }

    fn remove_directory(&mut self, path: &str) -> Result<(), CommandError> {
        let target =
            resolve_node(&self.tree, self.current, path).context(RemoveDirectorySnafu { path })?;

        if target == self.tree.root() || target == self.current {
            return CannotRemoveSnafu { path }.fail();
        }

        let node = self
            .tree
            .node(target)
            .context(CannotRemoveSnafu { path })?;
        let parent = node.parent().context(CannotRemoveSnafu { path })?;
        let name = node.name().to_string();

        match self.tree.remove_item(parent, &name) {
            Ok(()) => {
                info!("Removed directory '{}'", path);
                Ok(())
            }
            Err(TreeError::NotEmpty { .. }) => DirectoryNotEmptySnafu { path }.fail(),
            Err(TreeError::NotADirectory { .. }) => RemoveNonDirectorySnafu { path }.fail(),
            Err(error) => {
                debug!("Unexpected failure removing '{}': {}", path, error);
                CannotRemoveSnafu { path }.fail()
            }
        }
    }
}
