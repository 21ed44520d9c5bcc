use std::collections::BTreeMap;

use derive_more::Display;
use slab::Slab;
use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use super::{CURRENT_SEGMENT, HOME_SEGMENT, PARENT_SEGMENT};

/// Handle to a node stored in an [`FsTree`].
///
/// Slab slots are recycled, so a handle also carries the generation the node
/// was created with. A handle to a removed node stops resolving even after its
/// slot is taken by a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{key}.{generation}")]
pub struct NodeId {
    key: usize,
    generation: u64,
}

/// Represents the type of a filesystem node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory {
        children: BTreeMap<String, NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    generation: u64,
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FsTree {
    nodes: Slab<Node>,
    next_generation: u64,
    root: NodeId,
}

impl FsTree {
    /// Creates a tree holding only an empty root directory
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut tree = FsTree {
            nodes: Slab::new(),
            next_generation: 0,
            root: NodeId {
                key: 0,
                generation: 0,
            },
        };
        tree.root = tree.insert(
            root_name.into(),
            None,
            NodeKind::Directory {
                children: BTreeMap::new(),
            },
        );
        tree
    }

    fn insert(&mut self, name: String, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let generation = self.next_generation;
        self.next_generation += 1;
        let key = self.nodes.insert(Node {
            generation,
            name,
            parent,
            kind,
        });
        NodeId { key, generation }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.key)
            .filter(|node| node.generation == id.generation)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.key)
            .filter(|node| node.generation == id.generation)
    }

    /// Number of nodes currently in the tree, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn find_child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.node(dir)?.children()?.get(name).copied()
    }

    /// True when `dir` is a directory with no children
    pub fn is_empty(&self, dir: NodeId) -> bool {
        self.node(dir)
            .and_then(Node::children)
            .is_some_and(BTreeMap::is_empty)
    }

    pub fn add_directory(&mut self, dir: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.add_item(
            dir,
            name,
            NodeKind::Directory {
                children: BTreeMap::new(),
            },
        )
    }

    pub fn add_file(&mut self, dir: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.add_item(dir, name, NodeKind::File)
    }

    /// Attaches a new node under `dir`. Nothing changes if the name is taken.
    fn add_item(&mut self, dir: NodeId, name: &str, kind: NodeKind) -> Result<NodeId, TreeError> {
        let special = [CURRENT_SEGMENT, PARENT_SEGMENT, HOME_SEGMENT].contains(&name);
        if special || name.is_empty() || name.contains('/') {
            return InvalidNameSnafu { name }.fail();
        }

        let parent = self.node(dir).context(MissingNodeSnafu { id: dir })?;
        let siblings = parent.children().context(NotADirectorySnafu {
            name: parent.name(),
        })?;
        if siblings.contains_key(name) {
            return NameTakenSnafu { name }.fail();
        }

        let id = self.insert(name.to_string(), Some(dir), kind);
        if let Some(Node {
            kind: NodeKind::Directory { children },
            ..
        }) = self.node_mut(dir)
        {
            children.insert(name.to_string(), id);
        }

        debug!("Added '{}' as {} under {}", name, id, dir);
        Ok(id)
    }

    /// Removes the named child of `dir`, which must be an empty directory
    pub fn remove_item(&mut self, dir: NodeId, name: &str) -> Result<(), TreeError> {
        let id = self
            .find_child(dir, name)
            .context(NoSuchEntrySnafu { name })?;
        let target = self.node(id).context(MissingNodeSnafu { id })?;
        ensure!(target.is_directory(), NotADirectorySnafu { name });
        ensure!(self.is_empty(id), NotEmptySnafu { name });

        if let Some(Node {
            kind: NodeKind::Directory { children },
            ..
        }) = self.node_mut(dir)
        {
            children.remove(name);
        }
        self.nodes.remove(id.key);

        debug!("Removed '{}' ({}) from {}", name, id, dir);
        Ok(())
    }

    /// Lists the direct children of `dir` in ascending order, one per line
    pub fn render(&self, dir: NodeId) -> String {
        self.node(dir)
            .and_then(Node::children)
            .map(|children| {
                children
                    .keys()
                    .map(|name| format!("{name}\n"))
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Names from the root down to `id`, both ends included
    pub fn path_names(&self, id: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            names.push(node.name());
            cursor = node.parent().and_then(|parent| self.node(parent));
        }
        names.reverse();
        names
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TreeError {
    #[snafu(display("'{}' already exists", name))]
    NameTaken { name: String },
    #[snafu(display("'{}' does not exist", name))]
    NoSuchEntry { name: String },
    #[snafu(display("'{}' is not a directory", name))]
    NotADirectory { name: String },
    #[snafu(display("'{}' is not empty", name))]
    NotEmpty { name: String },
    #[snafu(display("'{}' is not a valid entry name", name))]
    InvalidName { name: String },
    #[snafu(display("Node {} is no longer part of the tree", id))]
    MissingNode { id: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn tree() -> FsTree {
        FsTree::new("home")
    }

    #[rstest]
    fn new_tree_has_only_an_empty_root(tree: FsTree) {
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.render(tree.root()), "");
        assert_eq!(tree.path_names(tree.root()), vec!["home"]);
    }

    #[rstest]
    fn add_directory_links_parent_and_child(mut tree: FsTree) {
        let root = tree.root();
        let docs = tree.add_directory(root, "docs").unwrap();

        assert_eq!(tree.find_child(root, "docs"), Some(docs));
        let node = tree.node(docs).unwrap();
        assert_eq!(node.name(), "docs");
        assert_eq!(node.parent(), Some(root));
        assert!(node.is_directory());
    }

    #[rstest]
    fn add_item_rejects_duplicate_names(mut tree: FsTree) {
        let root = tree.root();
        tree.add_directory(root, "docs").unwrap();

        let second = tree.add_file(root, "docs");

        assert_eq!(
            second,
            Err(TreeError::NameTaken {
                name: "docs".to_string()
            })
        );
        assert_eq!(tree.len(), 2);
    }

    #[rstest]
    #[case("")]
    #[case("a/b")]
    #[case(".")]
    #[case("..")]
    #[case("~")]
    fn add_item_rejects_invalid_names(mut tree: FsTree, #[case] name: &str) {
        let root = tree.root();
        assert!(matches!(
            tree.add_directory(root, name),
            Err(TreeError::InvalidName { .. })
        ));
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    fn add_item_into_file_fails(mut tree: FsTree) {
        let root = tree.root();
        let file = tree.add_file(root, "notes.txt").unwrap();

        assert!(matches!(
            tree.add_directory(file, "inner"),
            Err(TreeError::NotADirectory { .. })
        ));
    }

    #[rstest]
    fn find_child_on_file_is_none(mut tree: FsTree) {
        let root = tree.root();
        let file = tree.add_file(root, "notes.txt").unwrap();
        assert_eq!(tree.find_child(file, "anything"), None);
    }

    #[rstest]
    fn remove_item_removes_empty_directory(mut tree: FsTree) {
        let root = tree.root();
        let docs = tree.add_directory(root, "docs").unwrap();

        assert_eq!(tree.remove_item(root, "docs"), Ok(()));
        assert_eq!(tree.find_child(root, "docs"), None);
        assert!(tree.node(docs).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    fn remove_item_refuses_non_empty_directory(mut tree: FsTree) {
        let root = tree.root();
        let docs = tree.add_directory(root, "docs").unwrap();
        tree.add_directory(docs, "drafts").unwrap();

        assert_eq!(
            tree.remove_item(root, "docs"),
            Err(TreeError::NotEmpty {
                name: "docs".to_string()
            })
        );
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.find_child(root, "docs"), Some(docs));
    }

    #[rstest]
    fn remove_item_refuses_files_and_missing_names(mut tree: FsTree) {
        let root = tree.root();
        tree.add_file(root, "notes.txt").unwrap();

        assert!(matches!(
            tree.remove_item(root, "notes.txt"),
            Err(TreeError::NotADirectory { .. })
        ));
        assert!(matches!(
            tree.remove_item(root, "missing"),
            Err(TreeError::NoSuchEntry { .. })
        ));
        assert_eq!(tree.len(), 2);
    }

    #[rstest]
    fn stale_handles_do_not_resolve_after_slot_reuse(mut tree: FsTree) {
        let root = tree.root();
        let first = tree.add_directory(root, "a").unwrap();
        tree.remove_item(root, "a").unwrap();
        let second = tree.add_directory(root, "b").unwrap();

        assert_eq!(first.key, second.key);
        assert_ne!(first, second);
        assert!(tree.node(first).is_none());
        assert_eq!(tree.node(second).unwrap().name(), "b");
        assert_eq!(tree.find_child(first, "anything"), None);
        assert!(matches!(
            tree.add_directory(first, "inner"),
            Err(TreeError::MissingNode { .. })
        ));
    }

    #[rstest]
    fn repeated_add_and_remove_reuses_slots(mut tree: FsTree) {
        let root = tree.root();
        for _ in 0..1000 {
            tree.add_directory(root, "x").unwrap();
            tree.remove_item(root, "x").unwrap();
        }

        assert_eq!(tree.len(), 1);
        assert!(tree.nodes.capacity() < 16);
        assert_eq!(tree.render(root), "");
    }

    #[rstest]
    fn is_empty_only_holds_for_childless_directories(mut tree: FsTree) {
        let root = tree.root();
        assert!(tree.is_empty(root));

        let docs = tree.add_directory(root, "docs").unwrap();
        let file = tree.add_file(root, "notes.txt").unwrap();
        assert!(!tree.is_empty(root));
        assert!(tree.is_empty(docs));
        assert!(!tree.is_empty(file));

        tree.remove_item(root, "docs").unwrap();
        assert!(!tree.is_empty(docs));
    }

    #[rstest]
    fn render_lists_children_in_lexicographic_order(mut tree: FsTree) {
        let root = tree.root();
        for name in ["pear", "Apple", "banana", "apple", "10", "9"] {
            tree.add_directory(root, name).unwrap();
        }

        let rendered = tree.render(root);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines, vec!["10", "9", "Apple", "apple", "banana", "pear"]);
        assert!(lines.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[rstest]
    fn path_names_walks_up_to_root(mut tree: FsTree) {
        let root = tree.root();
        let a = tree.add_directory(root, "a").unwrap();
        let b = tree.add_directory(a, "b").unwrap();

        assert_eq!(tree.path_names(b), vec!["home", "a", "b"]);
    }
}
