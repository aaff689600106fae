use crate::tree::{Node, TreePath};

/// Whether an orphan entry is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl From<bool> for Decision {
    fn from(accept: bool) -> Self {
        if accept {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}

/// Caller-supplied policy for entries present on only one side.
///
/// Called exactly once per orphan path of the side it is attached to.
pub trait OrphanHandler {
    fn handle(&mut self, path: &TreePath, node: &Node) -> Decision;
}

impl<F> OrphanHandler for F
where
    F: FnMut(&TreePath, &Node) -> Decision,
{
    fn handle(&mut self, path: &TreePath, node: &Node) -> Decision {
        self(path, node)
    }
}

/// Handler paired with an opaque baton owned by the caller.
///
/// The comparator never looks at the baton; it is lent to the callback on
/// each call and handed back through [`BatonHandler::into_baton`].
pub struct BatonHandler<B, F> {
    baton: B,
    callback: F,
}

impl<B, F> BatonHandler<B, F>
where
    F: FnMut(&TreePath, &Node, &mut B) -> Decision,
{
    pub fn new(callback: F, baton: B) -> Self {
        Self { baton, callback }
    }

    pub fn baton(&self) -> &B {
        &self.baton
    }

    pub fn into_baton(self) -> B {
        self.baton
    }
}

impl<B, F> OrphanHandler for BatonHandler<B, F>
where
    F: FnMut(&TreePath, &Node, &mut B) -> Decision,
{
    fn handle(&mut self, path: &TreePath, node: &Node) -> Decision {
        (self.callback)(path, node, &mut self.baton)
    }
}

/// The optional handlers for both sides of one comparison.
#[derive(Default)]
pub struct Handlers<'h> {
    pub only_in_actual: Option<&'h mut dyn OrphanHandler>,
    pub only_in_expected: Option<&'h mut dyn OrphanHandler>,
}

impl<'h> Handlers<'h> {
    /// Every orphan is a mismatch.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only_in_actual(mut self, handler: &'h mut dyn OrphanHandler) -> Self {
        self.only_in_actual = Some(handler);
        self
    }

    pub fn only_in_expected(mut self, handler: &'h mut dyn OrphanHandler) -> Self {
        self.only_in_expected = Some(handler);
        self
    }
}
