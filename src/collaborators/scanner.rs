use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;
use crate::tree::{Properties, TreePath};

pub const DEFAULT_ADMIN_AREA: &str = ".svn";

/// One file or directory found below a working-copy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    /// Relative to the scanned root.
    pub path: TreePath,
    /// File bytes; `None` for directories.
    pub contents: Option<Vec<u8>>,
    pub properties: Properties,
}

/// Reflects on-disk working-copy state.
pub trait WorkingCopyScanner {
    fn scan(&self, root: &Path) -> Result<Vec<ScannedEntry>, ScanError>;
}

/// Supplies the metadata recorded for an entry.
pub trait PropertyReader {
    fn read(&self, root: &Path, path: &TreePath) -> Result<Properties, ScanError>;
}

/// Reader for working copies with no recorded properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProperties;

impl PropertyReader for NoProperties {
    fn read(&self, _root: &Path, _path: &TreePath) -> Result<Properties, ScanError> {
        Ok(Properties::new())
    }
}

/// Walks the directory with `walkdir`, skipping the administrative area.
#[derive(Debug, Clone)]
pub struct WalkdirScanner<R = NoProperties> {
    admin_area: String,
    properties: R,
}

impl Default for WalkdirScanner {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_AREA)
    }
}

impl WalkdirScanner {
    pub fn new(admin_area: impl Into<String>) -> Self {
        Self {
            admin_area: admin_area.into(),
            properties: NoProperties,
        }
    }
}

impl<R: PropertyReader> WalkdirScanner<R> {
    pub fn with_property_reader<P: PropertyReader>(self, properties: P) -> WalkdirScanner<P> {
        WalkdirScanner {
            admin_area: self.admin_area,
            properties,
        }
    }

    fn is_admin_area(&self, name: &OsStr) -> bool {
        name == OsStr::new(&self.admin_area)
    }
}

impl<R: PropertyReader> WorkingCopyScanner for WalkdirScanner<R> {
    fn scan(&self, root: &Path) -> Result<Vec<ScannedEntry>, ScanError> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_admin_area(entry.file_name()));

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.context(WalkSnafu {
                root: root.to_path_buf(),
            })?;

            let relative = entry
                .path()
                .strip_prefix(root)
                .ok()
                .context(OutsideRootSnafu {
                    path: entry.path().to_path_buf(),
                })?;
            let path = TreePath::from_path(relative);

            let contents = if entry.file_type().is_dir() {
                None
            } else {
                Some(fs::read(entry.path()).context(ReadSnafu {
                    path: entry.path().to_path_buf(),
                })?)
            };

            let properties = self.properties.read(root, &path)?;
            entries.push(ScannedEntry {
                path,
                contents,
                properties,
            });
        }

        Ok(entries)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ScanError {
    #[snafu(display("Failed to walk {}", root.best_effort_path_display()))]
    WalkError {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[snafu(display("Failed to read {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} is not below the scanned root", path.best_effort_path_display()))]
    OutsideRoot { path: PathBuf },
    #[snafu(display("Failed to read properties of '{}': {}", path, reason))]
    PropertyError { path: TreePath, reason: String },
}
