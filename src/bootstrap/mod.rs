//! The pristine seed repository and the per-test copies made from it.

mod bootstrapper;
mod copy;

pub use bootstrapper::{BootstrapError, Bootstrapper};
pub use copy::{CopyError, clear_target, duplicate_dir, remove_dir_if_present};
