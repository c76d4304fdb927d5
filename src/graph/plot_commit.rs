use crate::graph::lane::{LanePlacement, PlotLane};
use crate::models::{GitCommit, GitRef};

/// A commit together with everything needed to draw its row
#[derive(Debug, Clone, PartialEq)]
pub struct PlotCommit {
    pub commit: GitCommit,
    pub row: usize,
    pub lane: PlotLane,
    /// One lane per plotted parent, first parent first
    pub parent_lanes: Vec<PlotLane>,
    /// Lanes arriving from children above, in registration order
    pub child_lanes: Vec<PlotLane>,
    pub passing_lanes: Vec<PlotLane>,
    pub refs: Vec<GitRef>,
    /// History was cut here: a parent is missing or beyond the fill limit
    pub boundary: bool,
}

impl PlotCommit {
    pub(crate) fn from_placement(
        commit: GitCommit,
        row: usize,
        placement: LanePlacement,
        refs: Vec<GitRef>,
    ) -> Self {
        Self {
            commit,
            row,
            lane: placement.lane,
            parent_lanes: placement.parent_lanes,
            child_lanes: placement.child_lanes,
            passing_lanes: placement.passing_lanes,
            refs,
            boundary: placement.boundary,
        }
    }

    pub fn id(&self) -> &str {
        &self.commit.id
    }

    pub fn short_message(&self) -> &str {
        &self.commit.summary
    }

    /// Whether a line comes down into this commit's own lane
    pub fn has_incoming(&self) -> bool {
        !self.child_lanes.is_empty()
    }

    /// Lanes of other children that end at this commit
    pub fn merging_lanes(&self) -> &[PlotLane] {
        self.child_lanes.get(1..).unwrap_or(&[])
    }

    /// Lanes that branch off towards the second and later parents
    pub fn forking_lanes(&self) -> &[PlotLane] {
        self.parent_lanes.get(1..).unwrap_or(&[])
    }

    pub fn is_merge(&self) -> bool {
        self.commit.parent_ids.len() > 1
    }

    /// Every lane touched while drawing this row
    pub fn lanes_in_row(&self) -> impl Iterator<Item = PlotLane> + '_ {
        std::iter::once(self.lane)
            .chain(self.passing_lanes.iter().copied())
            .chain(self.merging_lanes().iter().copied())
            .chain(self.forking_lanes().iter().copied())
    }
}
