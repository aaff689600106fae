//! Structural and attribute comparison of two trees.

mod comparator;
mod handler;
mod report;

pub use comparator::{Comparison, compare_trees};
pub use handler::{BatonHandler, Decision, Handlers, OrphanHandler};
pub use report::{Mismatch, MismatchReport};
