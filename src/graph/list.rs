use crate::graph::lane::LaneAllocator;
use crate::graph::plot_commit::PlotCommit;
use crate::graph::source::CommitSource;
use tracing::{debug, info};

/// Commits pulled per build when the caller does not say otherwise
pub const DEFAULT_FILL_LIMIT: usize = 1000;

/// Ordered, bounded result of one layout pass.
///
/// A list is filled once from a [`CommitSource`] and then only read. A new
/// repository state means a new list.
#[derive(Debug, Default)]
pub struct PlotCommitList {
    commits: Vec<PlotCommit>,
    lane_count: usize,
    filled: bool,
    complete: bool,
}

impl PlotCommitList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `source`, stopping after `limit` commits
    pub fn build<S: CommitSource + ?Sized>(source: &mut S, limit: usize) -> Self {
        let mut list = Self::new();
        list.fill_to(source, limit);
        list
    }

    /// Pull commits until `limit` rows exist or the source runs dry.
    ///
    /// Only the first call does any work. Returns the number of rows.
    pub fn fill_to<S: CommitSource + ?Sized>(&mut self, source: &mut S, limit: usize) -> usize {
        if self.filled {
            debug!("Plot list already filled with {} commits", self.commits.len());
            return self.commits.len();
        }
        self.filled = true;

        info!("Filling plot list up to {} commits", limit);
        let mut lanes = LaneAllocator::new();

        while self.commits.len() < limit {
            let Some(commit) = source.next_commit() else {
                self.complete = true;
                break;
            };

            let row = self.commits.len();
            let Some(placement) = lanes.place(&commit, row, |id| source.is_known(id)) else {
                continue;
            };
            let refs = source.refs_for(&commit.id);
            self.commits
                .push(PlotCommit::from_placement(commit, row, placement, refs));
        }

        for row in lanes.finish() {
            if let Some(commit) = self.commits.get_mut(row) {
                commit.boundary = true;
            }
        }
        self.lane_count = lanes.lane_count();

        info!(
            "Plot list holds {} commits across {} lanes (complete: {})",
            self.commits.len(),
            self.lane_count,
            self.complete
        );
        self.commits.len()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&PlotCommit> {
        self.commits.get(row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlotCommit> {
        self.commits.iter()
    }

    pub fn as_slice(&self) -> &[PlotCommit] {
        &self.commits
    }

    pub fn find(&self, id: &str) -> Option<&PlotCommit> {
        self.commits.iter().find(|c| c.id() == id)
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// True when the source ran out before the fill limit was hit
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl<'a> IntoIterator for &'a PlotCommitList {
    type Item = &'a PlotCommit;
    type IntoIter = std::slice::Iter<'a, PlotCommit>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}
