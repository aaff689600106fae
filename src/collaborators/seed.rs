use std::fs;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::builders::{attrs, build_generic_tree, props};
use crate::ext::BestEffortPathExt;
use crate::tree::{Tree, TreeError};

/// The canonical fixture every repository starts from. Directories carry no
/// contents.
pub const GREEK_TREE: &[(&str, Option<&str>)] = &[
    ("iota", Some("This is the file 'iota'.")),
    ("A", None),
    ("A/mu", Some("This is the file 'mu'.")),
    ("A/B", None),
    ("A/B/lambda", Some("This is the file 'lambda'.")),
    ("A/B/E", None),
    ("A/B/E/alpha", Some("This is the file 'alpha'.")),
    ("A/B/E/beta", Some("This is the file 'beta'.")),
    ("A/B/F", None),
    ("A/C", None),
    ("A/D", None),
    ("A/D/gamma", Some("This is the file 'gamma'.")),
    ("A/D/G", None),
    ("A/D/G/pi", Some("This is the file 'pi'.")),
    ("A/D/G/rho", Some("This is the file 'rho'.")),
    ("A/D/G/tau", Some("This is the file 'tau'.")),
    ("A/D/H", None),
    ("A/D/H/chi", Some("This is the file 'chi'.")),
    ("A/D/H/psi", Some("This is the file 'psi'.")),
    ("A/D/H/omega", Some("This is the file 'omega'.")),
];

pub fn seed_paths() -> impl Iterator<Item = &'static str> {
    GREEK_TREE.iter().map(|(path, _)| *path)
}

/// Expected disk tree of a fresh checkout: every seed path with its contents.
pub fn seed_disk_tree() -> Result<Tree, TreeError> {
    build_generic_tree(
        GREEK_TREE
            .iter()
            .map(|(path, contents)| (*path, *contents, props([]), attrs([]))),
    )
}

/// Serializes `entries` below `dir`, replacing whatever was there.
pub fn write_tree(dir: &Path, entries: &[(&str, Option<&str>)]) -> Result<(), SeedError> {
    debug!("Writing {} seed entries to {}", entries.len(), dir.best_effort_path_display());

    if dir.exists() {
        fs::remove_dir_all(dir).context(WriteSnafu {
            path: dir.to_path_buf(),
        })?;
    }
    fs::create_dir_all(dir).context(WriteSnafu {
        path: dir.to_path_buf(),
    })?;

    for (relative, contents) in entries {
        let path = dir.join(relative);
        match contents {
            Some(contents) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).context(WriteSnafu { path: parent })?;
                }
                fs::write(&path, contents).context(WriteSnafu { path: &path })?;
            }
            None => fs::create_dir_all(&path).context(WriteSnafu { path: &path })?,
        }
    }

    Ok(())
}

#[derive(Debug, Snafu)]
pub enum SeedError {
    #[snafu(display("Failed to write seed entry {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
