use crate::models::GitCommit;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Horizontal track a line of development is drawn in.
///
/// The position doubles as the color identity: renderers map it onto their
/// palette with `position % palette.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlotLane {
    pub position: usize,
}

impl PlotLane {
    pub const fn new(position: usize) -> Self {
        Self { position }
    }

    pub fn color_index(&self, palette_len: usize) -> usize {
        if palette_len == 0 {
            0
        } else {
            self.position % palette_len
        }
    }
}

/// Lane decisions for one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanePlacement {
    pub lane: PlotLane,
    /// One lane per plotted parent, first parent first. The first entry is
    /// always `lane` itself.
    pub parent_lanes: Vec<PlotLane>,
    /// Lanes arriving from already placed children, in registration order.
    /// The first entry is `lane`; the rest end at this commit.
    pub child_lanes: Vec<PlotLane>,
    /// Live lanes crossing this row on their way to other commits
    pub passing_lanes: Vec<PlotLane>,
    /// A parent was missing, self-referencing or already placed
    pub boundary: bool,
}

#[derive(Debug, Clone)]
struct Registration {
    lane: PlotLane,
    child_row: usize,
}

/// Assigns lanes to commits arriving newest first.
///
/// Every live lane carries exactly one pending edge from a placed child to
/// the parent it waits for. Lanes ending at a commit are released once its
/// row is placed and get reused smallest index first.
#[derive(Debug, Default)]
pub struct LaneAllocator {
    /// lane position -> id of the parent the lane is heading to
    live: BTreeMap<usize, String>,
    free: BTreeSet<usize>,
    width: usize,
    waiting: HashMap<String, Vec<Registration>>,
    placed: HashSet<String>,
}

impl LaneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lane indices handed out so far
    pub fn lane_count(&self) -> usize {
        self.width
    }

    pub fn live_lanes(&self) -> usize {
        self.live.len()
    }

    pub fn is_placed(&self, id: &str) -> bool {
        self.placed.contains(id)
    }

    /// Place `commit` on `row`. Returns `None` when the commit was placed
    /// before, which keeps malformed input from looping.
    pub fn place(
        &mut self,
        commit: &GitCommit,
        row: usize,
        is_known: impl Fn(&str) -> bool,
    ) -> Option<LanePlacement> {
        if self.placed.contains(&commit.id) {
            tracing::debug!("Commit {} already placed, skipping", commit.id);
            return None;
        }

        let passing_lanes: Vec<PlotLane> = self
            .live
            .iter()
            .filter(|(_, target)| **target != commit.id)
            .map(|(&position, _)| PlotLane::new(position))
            .collect();

        let registrations = self.waiting.remove(&commit.id).unwrap_or_default();
        let child_lanes: Vec<PlotLane> = registrations.iter().map(|r| r.lane).collect();
        let lane = match child_lanes.first() {
            Some(lane) => *lane,
            None => self.allocate(),
        };

        self.placed.insert(commit.id.clone());

        let mut boundary = false;
        let mut plotted: Vec<&String> = Vec::new();
        for parent in &commit.parent_ids {
            if plotted.contains(&parent) {
                continue;
            }
            if *parent == commit.id || self.placed.contains(parent) {
                tracing::warn!(
                    "Commit {} lists {} as a parent out of order, drawing a boundary",
                    commit.id,
                    parent
                );
                boundary = true;
                continue;
            }
            if !is_known(parent) {
                tracing::debug!("Parent {} of {} is not loaded", parent, commit.id);
                boundary = true;
                continue;
            }
            plotted.push(parent);
        }

        let mut parent_lanes = Vec::with_capacity(plotted.len());
        for (i, parent) in plotted.into_iter().enumerate() {
            let parent_lane = if i == 0 { lane } else { self.allocate() };
            self.live.insert(parent_lane.position, parent.clone());
            self.waiting.entry(parent.clone()).or_default().push(Registration {
                lane: parent_lane,
                child_row: row,
            });
            parent_lanes.push(parent_lane);
        }

        for ended in child_lanes.iter().skip(1) {
            self.release(*ended);
        }
        if parent_lanes.is_empty() {
            self.release(lane);
        }

        Some(LanePlacement {
            lane,
            parent_lanes,
            child_lanes,
            passing_lanes,
            boundary,
        })
    }

    /// Close out a fill pass. Returns the rows of commits still waiting for a
    /// parent that was never placed; their lanes are released.
    pub fn finish(&mut self) -> Vec<usize> {
        let mut rows: Vec<usize> = Vec::new();
        for (_, registrations) in self.waiting.drain() {
            for registration in registrations {
                rows.push(registration.child_row);
            }
        }
        let lanes: Vec<usize> = self.live.keys().copied().collect();
        for position in lanes {
            self.release(PlotLane::new(position));
        }

        rows.sort_unstable();
        rows.dedup();
        rows
    }

    fn allocate(&mut self) -> PlotLane {
        match self.free.pop_first() {
            Some(position) => PlotLane::new(position),
            None => {
                let position = self.width;
                self.width += 1;
                PlotLane::new(position)
            }
        }
    }

    fn release(&mut self, lane: PlotLane) {
        self.live.remove(&lane.position);
        if lane.position < self.width {
            self.free.insert(lane.position);
        }
    }
}
