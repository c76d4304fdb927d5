use crate::models::{GitCommit, GitRef};

/// Lazily produced, ordered stream of commits feeding a plot list.
///
/// Implementations yield commits newest first and never before any of their
/// children. The list stops pulling as soon as its fill limit is reached.
pub trait CommitSource {
    fn next_commit(&mut self) -> Option<GitCommit>;

    /// Reference labels pointing at `id`
    fn refs_for(&self, _id: &str) -> Vec<GitRef> {
        Vec::new()
    }

    /// Whether `id` exists and could be produced by this source. A parent
    /// that is not known turns its child into a boundary commit.
    fn is_known(&self, id: &str) -> bool;
}

impl<S: CommitSource + ?Sized> CommitSource for Box<S> {
    fn next_commit(&mut self) -> Option<GitCommit> {
        (**self).next_commit()
    }

    fn refs_for(&self, id: &str) -> Vec<GitRef> {
        (**self).refs_for(id)
    }

    fn is_known(&self, id: &str) -> bool {
        (**self).is_known(id)
    }
}
