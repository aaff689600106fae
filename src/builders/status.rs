use std::sync::LazyLock;

use regex::Regex;
use snafu::ResultExt;
use tracing::debug;

use crate::builders::error::{InvalidTreeSnafu, ParseError};
use crate::tree::{Node, REPOS_REV, STATUS, Tree, WC_REV};

const FORMAT: &str = "status";

// <status:2> <wc_rev> ( <repos_rev>) <path>
static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.{2})\s+(\d+|-)\s+\(\s*(\d+|-)\)\s+(\S.*)$").unwrap()
});

static SUMMARY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Status against revision:\s+\d+$").unwrap());

/// Parses fixed-column status output into nodes carrying `status`, `wc_rev`
/// and `repos_rev`.
pub fn build_tree_from_status<S: AsRef<str>>(lines: &[S]) -> Result<Tree, ParseError> {
    let mut nodes = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim_end();
        if line.trim().is_empty() || SUMMARY_LINE.is_match(line.trim()) {
            continue;
        }

        let node = parse_entry(line).ok_or_else(|| ParseError::UnparsableOutput {
            format: FORMAT,
            line_number: index + 1,
            line: line.to_string(),
        })?;
        nodes.push(node);
    }

    debug!("Parsed {} entries from {} output", nodes.len(), FORMAT);
    Tree::from_nodes(nodes).context(InvalidTreeSnafu { format: FORMAT })
}

fn parse_entry(line: &str) -> Option<Node> {
    let captures = ENTRY_LINE.captures(line)?;

    Some(
        Node::new(captures.get(4)?.as_str().trim())
            .with_attribute(STATUS, captures.get(1)?.as_str())
            .with_attribute(WC_REV, captures.get(2)?.as_str())
            .with_attribute(REPOS_REV, captures.get(3)?.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn columns_become_attributes() {
        let tree = build_tree_from_status(&[
            "_      1    (     1)  wc",
            "M      1    (     2)  wc/A/mu",
            "_      -    (     2)  wc/A/new dir",
        ])
        .unwrap();

        let root = tree.get("wc").unwrap();
        assert_eq!(root.attribute(STATUS), Some("_ "));
        assert_eq!(root.attribute(WC_REV), Some("1"));
        assert_eq!(root.attribute(REPOS_REV), Some("1"));

        let mu = tree.get("wc/A/mu").unwrap();
        assert_eq!(mu.attribute(STATUS), Some("M "));
        assert_eq!(mu.attribute(REPOS_REV), Some("2"));

        assert_eq!(tree.get("wc/A/new dir").unwrap().attribute(WC_REV), Some("-"));
    }

    #[test]
    fn two_column_codes_are_kept_verbatim() {
        let tree = build_tree_from_status(&["MM  3  ( 3)  wc/iota"]).unwrap();
        assert_eq!(tree.get("wc/iota").unwrap().attribute(STATUS), Some("MM"));
    }

    #[test]
    fn status_summary_is_skipped() {
        let tree = build_tree_from_status(&["_   1  ( 1)  wc", "Status against revision:      1"])
            .unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    #[case("?  wc/unversioned")]
    #[case("_   1  1  wc/A")]
    #[case("svn: 'wc' is not a working copy")]
    fn malformed_lines_fail_the_parse(#[case] line: &str) {
        let result = build_tree_from_status(&[line]);
        assert!(matches!(result, Err(ParseError::UnparsableOutput { line_number: 1, .. })));
    }
}
