use tracing::{debug, info};

use crate::compare::{Decision, Handlers, Mismatch, MismatchReport, OrphanHandler};
use crate::tree::{Node, Tree, TreePath};

/// Outcome of [`compare_trees`]. A mismatch is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch(MismatchReport),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }

    pub fn into_result(self) -> Result<(), MismatchReport> {
        match self {
            Comparison::Match => Ok(()),
            Comparison::Mismatch(report) => Err(report),
        }
    }
}

/// Compares `actual` against `expected`, collecting every mismatch.
///
/// For paths on both sides: contents are checked only when both sides have
/// them, properties must be equal as maps, and only the attributes present
/// on the expected node are asserted. Orphans go to the matching handler in
/// `handlers`; without one, or when it rejects, they are mismatches.
pub fn compare_trees(actual: &Tree, expected: &Tree, handlers: Handlers<'_>) -> Comparison {
    let mut report = MismatchReport::default();

    for actual_node in actual.entries() {
        if let Ok(expected_node) = expected.get(actual_node.path()) {
            compare_nodes(actual_node, expected_node, &mut report);
        }
    }

    let Handlers {
        only_in_actual,
        only_in_expected,
    } = handlers;

    let unexpected = actual
        .entries()
        .filter(|node| !expected.contains(node.path()));
    handle_orphans(unexpected, only_in_actual, &mut report, |path| {
        Mismatch::UnexpectedEntry { path }
    });

    let missing = expected
        .entries()
        .filter(|node| !actual.contains(node.path()));
    handle_orphans(missing, only_in_expected, &mut report, |path| {
        Mismatch::MissingEntry { path }
    });

    if report.is_empty() {
        debug!("Trees match ({} entries)", actual.len());
        Comparison::Match
    } else {
        info!("Trees differ: {}", report);
        Comparison::Mismatch(report)
    }
}

fn compare_nodes(actual: &Node, expected: &Node, report: &mut MismatchReport) {
    let path = actual.path();

    if let (Some(actual_contents), Some(expected_contents)) = (actual.contents(), expected.contents())
    {
        if actual_contents != expected_contents {
            report.push(Mismatch::Contents {
                path: path.clone(),
                actual: actual_contents.to_vec(),
                expected: expected_contents.to_vec(),
            });
        }
    }

    if actual.properties() != expected.properties() {
        report.push(Mismatch::Properties {
            path: path.clone(),
            actual: actual.properties().clone(),
            expected: expected.properties().clone(),
        });
    }

    for (name, expected_value) in expected.attributes() {
        let actual_value = actual.attribute(name);
        if actual_value != Some(expected_value.as_str()) {
            report.push(Mismatch::Attribute {
                path: path.clone(),
                name: name.clone(),
                actual: actual_value.map(str::to_string),
                expected: expected_value.clone(),
            });
        }
    }
}

fn handle_orphans<'a>(
    orphans: impl Iterator<Item = &'a Node>,
    mut handler: Option<&mut dyn OrphanHandler>,
    report: &mut MismatchReport,
    mismatch: impl Fn(TreePath) -> Mismatch,
) {
    for node in orphans {
        let decision = match handler.as_deref_mut() {
            Some(handler) => handler.handle(node.path(), node),
            None => Decision::Reject,
        };
        debug!("Orphan '{}': {:?}", node.path(), decision);

        if decision == Decision::Reject {
            report.push(mismatch(node.path().clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{attrs, build_generic_tree, build_tree_from_status, props};
    use crate::compare::BatonHandler;
    use crate::tree::{REPOS_REV, STATUS, VERB, WC_REV};
    use rstest::*;

    #[fixture]
    fn greek() -> Tree {
        build_generic_tree([
            ("iota", Some("This is the file 'iota'."), props([]), attrs([])),
            ("A", None, props([]), attrs([])),
            ("A/mu", Some("This is the file 'mu'."), props([("color", "red")]), attrs([])),
        ])
        .unwrap()
    }

    fn mismatches(comparison: Comparison) -> Vec<Mismatch> {
        match comparison {
            Comparison::Match => Vec::new(),
            Comparison::Mismatch(report) => report.mismatches().to_vec(),
        }
    }

    #[rstest]
    fn a_tree_matches_itself(greek: Tree) {
        assert_eq!(compare_trees(&greek, &greek, Handlers::none()), Comparison::Match);
        assert_eq!(
            compare_trees(&greek, &greek.clone(), Handlers::none()),
            Comparison::Match
        );
    }

    #[test]
    fn disjoint_trees_report_every_path_as_an_orphan() {
        let a = build_generic_tree([
            ("x", None::<&str>, props([]), attrs([])),
            ("y", None, props([]), attrs([])),
        ])
        .unwrap();
        let b = build_generic_tree([("z", None::<&str>, props([]), attrs([]))]).unwrap();

        assert_eq!(
            mismatches(compare_trees(&a, &b, Handlers::none())),
            vec![
                Mismatch::UnexpectedEntry { path: TreePath::new("x") },
                Mismatch::UnexpectedEntry { path: TreePath::new("y") },
                Mismatch::MissingEntry { path: TreePath::new("z") },
            ]
        );
    }

    #[rstest]
    fn absent_contents_are_not_checked(greek: Tree) {
        let expected = build_generic_tree([
            ("iota", None::<&str>, props([]), attrs([])),
            ("A", None, props([]), attrs([])),
            ("A/mu", None, props([("color", "red")]), attrs([])),
        ])
        .unwrap();
        assert!(compare_trees(&greek, &expected, Handlers::none()).is_match());
    }

    #[rstest]
    fn every_field_difference_is_collected(greek: Tree) {
        let expected = build_generic_tree([
            ("iota", Some("changed"), props([]), attrs([])),
            ("A", None, props([("color", "")]), attrs([])),
            ("A/mu", Some("This is the file 'mu'."), props([("color", "red")]), attrs([(VERB, "Adding")])),
        ])
        .unwrap();

        let found = mismatches(compare_trees(&greek, &expected, Handlers::none()));
        assert_eq!(found.len(), 3);
        assert!(matches!(&found[0], Mismatch::Contents { path, .. } if path.as_str() == "iota"));
        assert!(matches!(&found[1], Mismatch::Properties { path, .. } if path.as_str() == "A"));
        assert_eq!(
            found[2],
            Mismatch::Attribute {
                path: TreePath::new("A/mu"),
                name: VERB.to_string(),
                actual: None,
                expected: "Adding".to_string(),
            }
        );
    }

    #[test]
    fn only_expected_attributes_are_asserted() {
        let rich = build_generic_tree([(
            "wc/A/mu",
            None::<&str>,
            props([]),
            attrs([(STATUS, "M "), (WC_REV, "1"), (REPOS_REV, "2")]),
        )])
        .unwrap();
        let sparse = build_generic_tree([(
            "wc/A/mu",
            None::<&str>,
            props([]),
            attrs([(STATUS, "M ")]),
        )])
        .unwrap();

        assert!(compare_trees(&rich, &sparse, Handlers::none()).is_match());
        assert!(!compare_trees(&sparse, &rich, Handlers::none()).is_match());
    }

    #[rstest]
    fn handlers_see_each_orphan_once_and_decide(greek: Tree) {
        let expected = build_generic_tree([
            ("iota", Some("This is the file 'iota'."), props([]), attrs([])),
            ("A/B", None, props([]), attrs([])),
            ("A/C", None, props([]), attrs([])),
        ])
        .unwrap();

        let mut seen_actual = Vec::new();
        let mut tolerate_a = |path: &TreePath, _node: &Node| {
            seen_actual.push(path.to_string());
            Decision::from(path.as_str().starts_with('A'))
        };
        let mut seen_expected = BatonHandler::new(
            |path: &TreePath, _node: &Node, baton: &mut Vec<String>| {
                baton.push(path.to_string());
                Decision::from(path.as_str() == "A/B")
            },
            Vec::new(),
        );

        let comparison = compare_trees(
            &greek,
            &expected,
            Handlers::none()
                .only_in_actual(&mut tolerate_a)
                .only_in_expected(&mut seen_expected),
        );

        assert_eq!(
            mismatches(comparison),
            vec![Mismatch::MissingEntry { path: TreePath::new("A/C") }]
        );
        assert_eq!(seen_actual, vec!["A", "A/mu"]);
        assert_eq!(seen_expected.into_baton(), vec!["A/B", "A/C"]);
    }

    #[test]
    fn generic_and_status_trees_agree() {
        let expected = build_generic_tree([(
            "A/mu",
            None::<&str>,
            props([]),
            attrs([(STATUS, "_ "), (WC_REV, "1"), (REPOS_REV, "1")]),
        )])
        .unwrap();
        let actual = build_tree_from_status(&["_   1  ( 1)  A/mu"]).unwrap();

        assert_eq!(compare_trees(&actual, &expected, Handlers::none()), Comparison::Match);
    }

    #[test]
    fn into_result_exposes_the_report() {
        let a = build_generic_tree([("x", None::<&str>, props([]), attrs([]))]).unwrap();
        let report = compare_trees(&a, &Tree::empty(), Handlers::none())
            .into_result()
            .unwrap_err();
        assert_eq!(report.len(), 1);
    }
}
