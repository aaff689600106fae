use std::borrow::Borrow;
use std::path::Path;

use derive_more::Display;

/// A normalized, `/`-separated relative path identifying a node.
///
/// Every builder funnels its raw paths through [`TreePath::new`], so trees
/// built from tool output and trees built by hand agree on the exact string
/// for the same entry (`./A/mu`, `A\mu` and `A//mu/` all become `A/mu`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct TreePath(String);

impl TreePath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().replace('\\', "/");
        let absolute = raw.starts_with('/');

        let components = raw
            .split('/')
            .filter(|component| !component.is_empty() && *component != ".")
            .collect::<Vec<_>>();

        let joined = components.join("/");
        let normalized = match (absolute, joined.is_empty()) {
            (true, _) => format!("/{joined}"),
            (false, true) => ".".to_string(),
            (false, false) => joined,
        };

        TreePath(normalized)
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    /// Joins `child` below this path, normalizing the result.
    pub fn join(&self, child: impl AsRef<str>) -> Self {
        if self.0 == "." {
            Self::new(child)
        } else {
            Self::new(format!("{}/{}", self.0, child.as_ref()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path component, or the whole path for the root.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TreePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TreePath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TreePath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
