use std::collections::BTreeMap;

use crate::tree::TreePath;

pub const VERB: &str = "verb";
pub const STATUS: &str = "status";
pub const WC_REV: &str = "wc_rev";
pub const REPOS_REV: &str = "repos_rev";

pub type Properties = BTreeMap<String, String>;
pub type Attributes = BTreeMap<String, String>;

/// One entry of a [`Tree`](crate::tree::Tree).
///
/// `contents` is `None` for directories and for entries whose body is not
/// being verified. `attributes` carry observed facts that are not part of
/// the entry itself: the reported verb, the status code, revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    path: TreePath,
    contents: Option<Vec<u8>>,
    properties: Properties,
    attributes: Attributes,
}

impl Node {
    pub fn new(path: impl Into<TreePath>) -> Self {
        Node {
            path: path.into(),
            contents: None,
            properties: Properties::new(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_optional_contents(mut self, contents: Option<Vec<u8>>) -> Self {
        self.contents = contents;
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_fill_every_field() {
        let node = Node::new("./A/mu")
            .with_contents("This is the file 'mu'.")
            .with_property("svn:eol-style", "native")
            .with_attribute(STATUS, "_ ")
            .with_attribute(WC_REV, "1");

        assert_eq!(node.path().as_str(), "A/mu");
        assert_eq!(node.contents(), Some(&b"This is the file 'mu'."[..]));
        assert_eq!(node.properties().get("svn:eol-style").map(String::as_str), Some("native"));
        assert_eq!(node.attribute(STATUS), Some("_ "));
        assert_eq!(node.attribute(REPOS_REV), None);
    }

    #[test]
    fn directories_have_no_contents() {
        assert_eq!(Node::new("A/B").contents(), None);
    }
}
