//! Normalized hierarchical snapshot of named entries.
//!
//! The same [`Tree`] type describes what a client command reported, what a
//! working copy holds on disk and what a test expects, so any two of them
//! can be handed to the comparator.

mod node;
mod path;
mod tree;

pub use node::{Attributes, Node, Properties, REPOS_REV, STATUS, VERB, WC_REV};
pub use path::TreePath;
pub use tree::{Tree, TreeError};
