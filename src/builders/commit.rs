use std::sync::LazyLock;

use regex::Regex;
use snafu::ResultExt;
use tracing::debug;

use crate::builders::Verb;
use crate::builders::error::{InvalidTreeSnafu, ParseError};
use crate::tree::{Node, Tree, VERB};

const FORMAT: &str = "commit";

static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Adding|Sending|Deleting|Replacing)\s+(?:\(bin\)\s+)?(\S.*)$").unwrap()
});

static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Transmitting file data ?\.*|Committed revision \d+\.)$").unwrap()
});

/// Parses commit (and import) output once the sentinel line is gone.
///
/// `Transmitting file data` and `Committed revision N.` carry no path and are
/// skipped. Unknown lines fail the parse.
pub fn build_tree_from_commit<S: AsRef<str>>(lines: &[S]) -> Result<Tree, ParseError> {
    let mut nodes = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() || PROGRESS_LINE.is_match(line) {
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

/// Splits commit output into its final (sentinel) line and everything
/// before it. The sentinel is trimmed; `None` when there is no output.
pub fn extract_sentinel<S: AsRef<str>>(lines: &[S]) -> (Option<&str>, &[S]) {
    match lines.split_last() {
        Some((last, rest)) => (Some(last.as_ref().trim()), rest),
        None => (None, lines),
    }
}

fn parse_entry(line: &str) -> Option<Node> {
    let captures = ENTRY_LINE.captures(line)?;
    let verb = Verb::from_word(captures.get(1)?.as_str())?;
    let path = captures.get(2)?.as_str().trim();

    Some(Node::new(path).with_attribute(VERB, verb.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_paths_carry_their_verb() {
        let tree = build_tree_from_commit(&[
            "Sending        wc/A/mu",
            "Adding         wc/A/newfile",
            "Adding  (bin)  wc/A/logo.png",
            "Deleting       wc/A/B/lambda",
            "Transmitting file data ...",
            "Committed revision 2.",
        ])
        .unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get("wc/A/mu").unwrap().attribute(VERB), Some("Sending"));
        assert_eq!(tree.get("wc/A/newfile").unwrap().attribute(VERB), Some("Adding"));
        assert_eq!(tree.get("wc/A/logo.png").unwrap().attribute(VERB), Some("Adding"));
        assert_eq!(tree.get("wc/A/B/lambda").unwrap().attribute(VERB), Some("Deleting"));
    }

    #[test]
    fn import_paths_are_normalized() {
        let tree = build_tree_from_commit(&["Adding         ./A", "Adding         ./A/mu"]).unwrap();
        assert!(tree.contains("A"));
        assert!(tree.contains("A/mu"));
    }

    #[test]
    fn sentinel_line_is_not_an_entry() {
        let result = build_tree_from_commit(&["Sending A/mu", "Commit succeeded."]);
        assert_eq!(
            result,
            Err(ParseError::UnparsableOutput {
                format: FORMAT,
                line_number: 2,
                line: "Commit succeeded.".to_string(),
            })
        );
    }

    #[test]
    fn client_errors_fail_the_parse() {
        let result = build_tree_from_commit(&["svn: Commit failed (details follow):"]);
        assert!(matches!(result, Err(ParseError::UnparsableOutput { line_number: 1, .. })));
    }

    #[test]
    fn sentinel_is_split_from_the_entries() {
        let output = [
            "Sending        A/mu",
            "Transmitting file data .",
            "Committed revision 2.",
            "Commit succeeded.  ",
        ];
        let (sentinel, rest) = extract_sentinel(&output);
        assert_eq!(sentinel, Some("Commit succeeded."));
        assert_eq!(rest, &output[..3]);

        let tree = build_tree_from_commit(rest).unwrap();
        assert_eq!(tree.get("A/mu").unwrap().attribute(VERB), Some("Sending"));
    }

    #[test]
    fn empty_output_has_no_sentinel() {
        let (sentinel, rest) = extract_sentinel::<String>(&[]);
        assert_eq!(sentinel, None);
        assert!(rest.is_empty());
    }

    #[test]
    fn nothing_to_commit_is_an_empty_tree() {
        assert!(build_tree_from_commit::<&str>(&[]).unwrap().is_empty());
    }
}
