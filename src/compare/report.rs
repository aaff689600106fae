use std::fmt;

use crate::tree::{Properties, TreePath};

/// One disagreement between the actual and the expected tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Contents {
        path: TreePath,
        actual: Vec<u8>,
        expected: Vec<u8>,
    },
    Properties {
        path: TreePath,
        actual: Properties,
        expected: Properties,
    },
    Attribute {
        path: TreePath,
        name: String,
        actual: Option<String>,
        expected: String,
    },
    /// Present in the actual tree only.
    UnexpectedEntry { path: TreePath },
    /// Present in the expected tree only.
    MissingEntry { path: TreePath },
}

impl Mismatch {
    pub fn path(&self) -> &TreePath {
        match self {
            Mismatch::Contents { path, .. }
            | Mismatch::Properties { path, .. }
            | Mismatch::Attribute { path, .. }
            | Mismatch::UnexpectedEntry { path }
            | Mismatch::MissingEntry { path } => path,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Contents {
                path,
                actual,
                expected,
            } => write!(
                f,
                "{path}: contents differ (actual {:?}, expected {:?})",
                String::from_utf8_lossy(actual),
                String::from_utf8_lossy(expected)
            ),
            Mismatch::Properties {
                path,
                actual,
                expected,
            } => write!(
                f,
                "{path}: properties differ (actual {actual:?}, expected {expected:?})"
            ),
            Mismatch::Attribute {
                path,
                name,
                actual: Some(actual),
                expected,
            } => write!(
                f,
                "{path}: attribute '{name}' is {actual:?}, expected {expected:?}"
            ),
            Mismatch::Attribute {
                path,
                name,
                actual: None,
                expected,
            } => write!(
                f,
                "{path}: attribute '{name}' is absent, expected {expected:?}"
            ),
            Mismatch::UnexpectedEntry { path } => {
                write!(f, "{path}: unexpected entry, missing from the expected tree")
            }
            Mismatch::MissingEntry { path } => {
                write!(f, "{path}: expected entry missing from the actual tree")
            }
        }
    }
}

/// Every mismatch found by one comparison, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MismatchReport {
    mismatches: Vec<Mismatch>,
}

impl MismatchReport {
    pub(crate) fn push(&mut self, mismatch: Mismatch) {
        self.mismatches.push(mismatch);
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mismatches.len()
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} mismatch(es):", self.mismatches.len())?;
        for mismatch in &self.mismatches {
            writeln!(f, "  {mismatch}")?;
        }
        Ok(())
    }
}
