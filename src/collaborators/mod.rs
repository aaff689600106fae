//! Boundaries to the world outside the oracle: the client binary, repository
//! creation, filesystem scanning and the seed fixture.
//!
//! Everything here sits behind a trait so the orchestrators can be driven by
//! scripted stand-ins.

mod properties;
mod repository;
mod scanner;
mod seed;
mod tool_runner;

pub use properties::{ClientPropertyReader, parse_proplist};
pub use repository::{AdminCommandCreator, RepositoryCreator, RepositoryError};
pub use scanner::{
    DEFAULT_ADMIN_AREA, NoProperties, PropertyReader, ScanError, ScannedEntry, WalkdirScanner,
    WorkingCopyScanner,
};
pub use seed::{GREEK_TREE, SeedError, seed_disk_tree, seed_paths, write_tree};
pub use tool_runner::{CommandRunner, ToolError, ToolRunner};
