use std::collections::HashSet;

use hashlink::LinkedHashMap;
use snafu::Snafu;
use tracing::debug;

use crate::tree::{Node, TreePath};

/// An insertion-ordered set of [`Node`]s keyed by path.
///
/// Trees are immutable once built. Order only matters for how reports read;
/// comparison works on path sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: LinkedHashMap<TreePath, Node>,
}

impl Tree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collects `nodes` into a tree, rejecting the first repeated path.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, TreeError> {
        let nodes = nodes
            .into_iter()
            .try_fold(LinkedHashMap::new(), |mut acc, node| {
                if acc.contains_key(node.path()) {
                    Err(TreeError::DuplicatePath {
                        path: node.path().clone(),
                    })
                } else {
                    acc.insert(node.path().clone(), node);
                    Ok(acc)
                }
            })?;

        debug!("Built tree with {} nodes", nodes.len());
        Ok(Tree { nodes })
    }

    pub fn path_set(&self) -> HashSet<&TreePath> {
        self.nodes.keys().collect()
    }

    pub fn get(&self, path: impl AsRef<str>) -> Result<&Node, TreeError> {
        let path = TreePath::new(path);
        self.nodes
            .get(&path)
            .ok_or(TreeError::NotFound { path })
    }

    pub fn contains(&self, path: impl AsRef<str>) -> bool {
        self.nodes.contains_key(&TreePath::new(path))
    }

    /// Nodes in insertion order. Each call starts a fresh pass.
    pub fn entries(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TreeError {
    #[snafu(display("No entry for path '{}'", path))]
    NotFound { path: TreePath },
    #[snafu(display("Path '{}' appears more than once", path))]
    DuplicatePath { path: TreePath },
}
