use std::sync::LazyLock;

use regex::Regex;
use snafu::ResultExt;
use tracing::debug;

use crate::builders::Verb;
use crate::builders::error::{InvalidTreeSnafu, ParseError};
use crate::tree::{Node, STATUS, Tree, VERB};

const FORMAT: &str = "checkout/update";

static ENTRY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ADUGCRE_ ])([ADUGCRE_ ])?\s+(\S.*)$").unwrap());

static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Checked out|Updated to|At|Exported) revision \d+\.$").unwrap()
});

/// Parses the `<code> <path>` lines printed by checkout and update.
///
/// The closing `... revision N.` summary is skipped; any other line that is
/// not an entry fails the whole parse.
pub fn build_tree_from_checkout<S: AsRef<str>>(lines: &[S]) -> Result<Tree, ParseError> {
    let mut nodes = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim_end();
        if line.trim().is_empty() || SUMMARY_LINE.is_match(line) {
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
    let text_code = captures.get(1)?.as_str().chars().next()?;
    let prop_code = captures
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or(' ');
    let path = captures.get(3)?.as_str().trim();

    // A blank text column means only properties changed.
    let verb = Verb::from_code(text_code).or_else(|| Verb::from_code(prop_code))?;

    Some(
        Node::new(path)
            .with_attribute(VERB, verb.to_string())
            .with_attribute(STATUS, format!("{text_code}{prop_code}")),
    )
}
