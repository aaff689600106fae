use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::collaborators::{PropertyReader, ScanError, ToolRunner};
use crate::tree::{Properties, TreePath};

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Properties on '.*':$").unwrap());

static INLINE_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^  (\S+) : (.*)$").unwrap());

static PROPERTY_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^  (\S+)$").unwrap());

static PROPERTY_VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^    (.*)$").unwrap());

/// Reads recorded properties by asking the client for `proplist -v`.
///
/// The client warns instead of listing when an entry is unversioned; such
/// entries have no properties.
#[derive(Debug, Clone)]
pub struct ClientPropertyReader<T> {
    runner: T,
}

impl<T: ToolRunner> ClientPropertyReader<T> {
    pub fn new(runner: T) -> Self {
        Self { runner }
    }
}

impl<T: ToolRunner> PropertyReader for ClientPropertyReader<T> {
    fn read(&self, root: &Path, path: &TreePath) -> Result<Properties, ScanError> {
        let target = root.join(path.as_str()).to_string_lossy().to_string();

        let lines = self
            .runner
            .run("proplist", &["-v", target.as_str()])
            .map_err(|err| ScanError::PropertyError {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        parse_proplist(&lines).map_err(|reason| ScanError::PropertyError {
            path: path.clone(),
            reason,
        })
    }
}

/// Parses verbose property listings, both the `name : value` layout and the
/// layout with the value indented on the lines below its name.
pub fn parse_proplist<S: AsRef<str>>(lines: &[S]) -> Result<Properties, String> {
    let mut properties = Properties::new();
    let mut pending: Option<(String, Vec<String>)> = None;

    for line in lines {
        let line = line.as_ref().trim_end();

        if line.starts_with("svn: warning:") {
            debug!("No properties recorded: {}", line);
            return Ok(Properties::new());
        }

        if let Some(captures) = PROPERTY_VALUE.captures(line) {
            if let Some((_, values)) = pending.as_mut() {
                values.push(captures[1].to_string());
                continue;
            }
        }

        if let Some((name, values)) = pending.take() {
            properties.insert(name, values.join("\n"));
        }

        if line.is_empty() || HEADER_LINE.is_match(line) {
            continue;
        }
        if let Some(captures) = INLINE_PROPERTY.captures(line) {
            properties.insert(captures[1].to_string(), captures[2].to_string());
        } else if let Some(captures) = PROPERTY_NAME.captures(line) {
            pending = Some((captures[1].to_string(), Vec::new()));
        } else {
            return Err(format!("unexpected property listing line '{line}'"));
        }
    }

    if let Some((name, values)) = pending {
        properties.insert(name, values.join("\n"));
    }

    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use crate::builders::{attrs, build_generic_tree, build_tree_from_wc, props};
    use crate::collaborators::{ToolError, WalkdirScanner};
    use crate::compare::{Comparison, Handlers, compare_trees};

    #[rstest]
    #[case::inline(&["Properties on 'wc/iota':", "  svn:eol-style : native", "  color : red"])]
    #[case::indented(&["Properties on 'wc/iota':", "  svn:eol-style", "    native", "  color", "    red"])]
    fn both_listing_layouts_are_read(#[case] lines: &[&str]) {
        let properties = parse_proplist(lines).unwrap();
        assert_eq!(properties, props([("svn:eol-style", "native"), ("color", "red")]));
    }

    #[test]
    fn multi_line_values_are_joined() {
        let properties =
            parse_proplist(&["Properties on 'wc/A':", "  svn:ignore", "    *.o", "    *.tmp"]).unwrap();
        assert_eq!(properties, props([("svn:ignore", "*.o\n*.tmp")]));
    }

    #[test]
    fn unversioned_entries_have_no_properties() {
        let properties =
            parse_proplist(&["svn: warning: 'wc/junk' is not under version control"]).unwrap();
        assert!(properties.is_empty());
        assert!(parse_proplist::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_proplist(&["svn: Unable to open an ra_local session"]).is_err());
    }

    #[test]
    fn disk_trees_carry_client_properties() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::write(dir.path().join("iota"), "This is the file 'iota'.").unwrap();

        let requested = RefCell::new(Vec::new());
        let runner = |subcommand: &str, args: &[&str]| -> Result<Vec<String>, ToolError> {
            assert_eq!(subcommand, "proplist");
            assert_eq!(args[0], "-v");
            requested.borrow_mut().push(args[1].to_string());
            if args[1].ends_with("iota") {
                Ok(vec![
                    format!("Properties on '{}':", args[1]),
                    "  svn:keywords : Id".to_string(),
                ])
            } else {
                Ok(Vec::new())
            }
        };
        let scanner = WalkdirScanner::default().with_property_reader(ClientPropertyReader::new(&runner));

        let actual = build_tree_from_wc(&scanner, dir.path()).unwrap();
        let expected = build_generic_tree([
            ("A", None, props([]), attrs([])),
            ("iota", Some("This is the file 'iota'."), props([("svn:keywords", "Id")]), attrs([])),
        ])
        .unwrap();

        assert_eq!(compare_trees(&actual, &expected, Handlers::none()), Comparison::Match);
        assert_eq!(requested.borrow().len(), 2);
    }

    #[test]
    fn client_failures_name_the_entry() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("iota"), "x").unwrap();
        let runner = |_: &str, _: &[&str]| -> Result<Vec<String>, ToolError> {
            Ok(vec!["svn: E155007: not a working copy".to_string()])
        };
        let reader = ClientPropertyReader::new(runner);

        let result = reader.read(dir.path(), &TreePath::new("iota"));

        assert!(matches!(
            result,
            Err(ScanError::PropertyError { path, .. }) if path.as_str() == "iota"
        ));
    }
}
