use std::fs;
use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::debug;
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;

/// Copies `from` to `to` recursively, replacing anything already at `to`
/// and creating missing parents. The result shares nothing with `from`.
pub fn duplicate_dir(from: &Path, to: &Path) -> Result<(), CopyError> {
    debug!(
        "Copying {} to {}",
        from.best_effort_path_display(),
        to.best_effort_path_display()
    );

    clear_target(to)?;

    for entry in WalkDir::new(from) {
        let entry = entry.context(WalkSnafu { path: from })?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .ok()
            .context(OutsideSourceSnafu { path: entry.path() })?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).context(CreateSnafu { path: &target })?;
        } else {
            fs::copy(entry.path(), &target).context(CopyFileSnafu {
                from: entry.path(),
                to: &target,
            })?;
        }
    }

    Ok(())
}

/// Leaves nothing at `path` and makes sure its parent exists, so a tool can
/// create `path` from scratch.
pub fn clear_target(path: &Path) -> Result<(), CopyError> {
    remove_dir_if_present(path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(CreateSnafu { path: parent })?;
    }
    Ok(())
}

/// Removes a stale directory tree; a missing one is fine.
pub fn remove_dir_if_present(path: &Path) -> Result<(), CopyError> {
    if path.exists() {
        debug!("Removing {}", path.best_effort_path_display());
        fs::remove_dir_all(path).context(RemoveSnafu { path })?;
    }
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum CopyError {
    #[snafu(display("Failed to remove {}", path.best_effort_path_display()))]
    RemoveError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create {}", path.best_effort_path_display()))]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to walk {}", path.best_effort_path_display()))]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display(
        "Failed to copy {} to {}",
        from.best_effort_path_display(),
        to.best_effort_path_display()
    ))]
    CopyFileError {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} is not below the copied directory", path.best_effort_path_display()))]
    OutsideSource { path: PathBuf },
}
