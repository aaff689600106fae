use std::path::Path;

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::collaborators::{ScanError, ScannedEntry, WorkingCopyScanner};
use crate::ext::BestEffortPathExt;
use crate::tree::{Node, Tree, TreeError};

/// Turns scanned entries into a tree: files keep their bytes, directories
/// have no contents, attributes stay empty.
pub fn build_tree_from_entries(
    entries: impl IntoIterator<Item = ScannedEntry>,
) -> Result<Tree, TreeError> {
    Tree::from_nodes(entries.into_iter().map(|entry| {
        Node::new(entry.path)
            .with_optional_contents(entry.contents)
            .with_properties(entry.properties)
    }))
}

/// Scans the working copy at `root` and builds its disk tree. Paths are
/// relative to `root`.
pub fn build_tree_from_wc(
    scanner: &dyn WorkingCopyScanner,
    root: &Path,
) -> Result<Tree, DiskTreeError> {
    debug!("Scanning working copy {}", root.best_effort_path_display());
    let entries = scanner.scan(root).context(ScanSnafu)?;
    build_tree_from_entries(entries).context(InvalidTreeSnafu {
        root: root.best_effort_path_display(),
    })
}

#[derive(Debug, Snafu)]
pub enum DiskTreeError {
    #[snafu(display("Failed to scan the working copy"))]
    ScanError { source: ScanError },
    #[snafu(display("Scan of {} produced an invalid tree", root))]
    InvalidTreeError { root: String, source: TreeError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::WalkdirScanner;
    use crate::tree::{Properties, TreePath};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn entries_map_onto_nodes_without_attributes() {
        let tree = build_tree_from_entries([
            ScannedEntry {
                path: TreePath::new("A"),
                contents: None,
                properties: Properties::new(),
            },
            ScannedEntry {
                path: TreePath::new("A/mu"),
                contents: Some(b"This is the file 'mu'.".to_vec()),
                properties: [("svn:keywords".to_string(), "Id".to_string())].into(),
            },
        ])
        .unwrap();

        let mu = tree.get("A/mu").unwrap();
        assert_eq!(mu.contents(), Some(&b"This is the file 'mu'."[..]));
        assert_eq!(mu.properties().len(), 1);
        assert!(mu.attributes().is_empty());
        assert_eq!(tree.get("A").unwrap().contents(), None);
    }

    #[test]
    fn scans_a_real_directory() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(dir.path().join("A/B")).unwrap();
        fs::write(dir.path().join("iota"), "This is the file 'iota'.").unwrap();
        fs::write(dir.path().join("A/B/lambda"), "This is the file 'lambda'.").unwrap();

        let tree = build_tree_from_wc(&WalkdirScanner::default(), dir.path()).unwrap();

        assert_eq!(tree.len(), 4);
        assert!(tree.contains("A"));
        assert!(tree.contains("A/B"));
        assert_eq!(
            tree.get("A/B/lambda").unwrap().contents(),
            Some(&b"This is the file 'lambda'."[..])
        );
    }

    #[test]
    fn missing_directory_is_a_scan_error() {
        let result = build_tree_from_wc(
            &WalkdirScanner::default(),
            Path::new("/this/path/does/not/exist"),
        );
        assert!(matches!(result, Err(DiskTreeError::ScanError { .. })));
    }
}
