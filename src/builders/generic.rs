use crate::tree::{Attributes, Node, Properties, Tree, TreeError, TreePath};

/// One hand-written expectation: path, optional contents, properties and
/// attributes.
pub type GenericEntry<P, C> = (P, Option<C>, Properties, Attributes);

/// Builds a tree straight from a test author's literal list.
///
/// Expected trees are always built this way. Two entries normalizing to the
/// same path are a [`TreeError::DuplicatePath`].
pub fn build_generic_tree<P, C>(
    entries: impl IntoIterator<Item = GenericEntry<P, C>>,
) -> Result<Tree, TreeError>
where
    P: Into<TreePath>,
    C: Into<Vec<u8>>,
{
    Tree::from_nodes(
        entries
            .into_iter()
            .map(|(path, contents, properties, attributes)| {
                Node::new(path)
                    .with_optional_contents(contents.map(Into::into))
                    .with_properties(properties)
                    .with_attributes(attributes)
            }),
    )
}

/// Attribute map from literal pairs.
pub fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Property map from literal pairs.
pub fn props<const N: usize>(pairs: [(&str, &str); N]) -> Properties {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{STATUS, VERB};

    #[test]
    fn keeps_every_field_of_every_entry() {
        let tree = build_generic_tree([
            ("iota", Some("This is the file 'iota'."), props([("color", "red")]), attrs([])),
            ("A", None, props([]), attrs([(VERB, "Adding")])),
        ])
        .unwrap();

        let iota = tree.get("iota").unwrap();
        assert_eq!(iota.contents(), Some(&b"This is the file 'iota'."[..]));
        assert_eq!(iota.properties().get("color").map(String::as_str), Some("red"));
        assert_eq!(tree.get("A").unwrap().attribute(VERB), Some("Adding"));
        assert_eq!(
            tree.entries().map(|n| n.path().as_str()).collect::<Vec<_>>(),
            vec!["iota", "A"]
        );
    }

    #[test]
    fn rejects_duplicate_paths() {
        let result = build_generic_tree([
            ("wc/A/mu", None::<&str>, props([]), attrs([(STATUS, "_ ")])),
            ("wc/./A/mu", None, props([]), attrs([(STATUS, "M ")])),
        ]);
        assert!(matches!(result, Err(TreeError::DuplicatePath { .. })));
    }

    #[test]
    fn empty_input_is_an_empty_tree() {
        let tree = build_generic_tree(Vec::<GenericEntry<&str, &str>>::new()).unwrap();
        assert!(tree.is_empty());
    }
}
