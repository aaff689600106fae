//! Parsers that turn one source format each into a [`Tree`](crate::tree::Tree).
//!
//! Every builder normalizes paths through [`TreePath`](crate::tree::TreePath)
//! and rejects malformed input instead of returning a partial tree.

mod checkout;
mod commit;
mod disk;
mod error;
mod generic;
mod status;
mod verb;

pub use checkout::build_tree_from_checkout;
pub use commit::{build_tree_from_commit, extract_sentinel};
pub use disk::{DiskTreeError, build_tree_from_entries, build_tree_from_wc};
pub use error::ParseError;
pub use generic::{GenericEntry, attrs, build_generic_tree, props};
pub use status::build_tree_from_status;
pub use verb::Verb;
