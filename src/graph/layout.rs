use crate::graph::lane::PlotLane;
use crate::graph::plot_commit::PlotCommit;
use crate::models::GitRef;
use serde::{Deserialize, Serialize};

/// Sizes the layout works in. Coordinates are row-local: `y = 0` is the top
/// of the commit's row and `y = row_height` its bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotGeometry {
    pub lane_width: i32,
    pub line_width: i32,
    pub left_pad: i32,
    pub row_height: i32,
    /// Space between the rightmost line and the first label
    pub text_gap: i32,
    /// Space after each label
    pub label_spacing: i32,
}

impl PlotGeometry {
    /// Pixel sizes for the graphical renderers
    pub const fn pixels() -> Self {
        Self {
            lane_width: 14,
            line_width: 2,
            left_pad: 2,
            row_height: 20,
            text_gap: 8,
            label_spacing: 2,
        }
    }

    /// Character cells for the console renderer: two columns per lane, two
    /// lines per commit (the commit line and a connector line).
    pub const fn text() -> Self {
        Self {
            lane_width: 2,
            line_width: 1,
            left_pad: 0,
            row_height: 2,
            text_gap: 1,
            label_spacing: 1,
        }
    }

    pub fn dot_size(&self) -> i32 {
        let d = self.row_height.min(self.lane_width) / 2;
        d + (d & 1)
    }

    pub fn lane_x(&self, lane: PlotLane) -> i32 {
        self.left_pad + self.lane_width * lane.position as i32
    }

    pub fn lane_center(&self, lane: PlotLane) -> i32 {
        self.lane_x(lane) + self.lane_width / 2
    }

    /// Width of the graph area for `lanes` lanes
    pub fn graph_width(&self, lanes: usize) -> i32 {
        self.left_pad + self.lane_width * lanes as i32
    }
}

impl Default for PlotGeometry {
    fn default() -> Self {
        Self::pixels()
    }
}

/// One drawing step for a commit row, in paint order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    /// Colored after `lane`
    Line {
        lane: PlotLane,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: i32,
    },
    CommitDot { x: i32, y: i32, w: i32, h: i32 },
    BoundaryDot { x: i32, y: i32, w: i32, h: i32 },
    /// `x` is the start of the label run; each label is shifted right by
    /// the widths of the labels painted before it.
    Label { x: i32, y: i32, label: GitRef },
    /// `x` is the start of the label run, like [`DrawInstruction::Label`]
    Text { x: i32, y: i32, message: String },
}

/// Lay out one commit row.
///
/// Order: passing lines, lines merging in from above, the incoming line of
/// the commit's own lane, the outgoing first-parent line, fork lines, the
/// dot, the labels, the message.
pub fn plot_instructions(commit: &PlotCommit, geometry: &PlotGeometry) -> Vec<DrawInstruction> {
    let h = geometry.row_height;
    let mid = h / 2;
    let my_x = geometry.lane_center(commit.lane);
    let mut out = Vec::new();
    let mut max_center = my_x;

    for &lane in &commit.passing_lanes {
        let cx = geometry.lane_center(lane);
        out.push(line(geometry, lane, cx, 0, cx, h));
        max_center = max_center.max(cx);
    }

    for &lane in commit.merging_lanes() {
        let cx = geometry.lane_center(lane);
        if (cx - my_x).abs() > geometry.lane_width {
            let ix = if cx < my_x {
                cx + geometry.lane_width / 2
            } else {
                cx - geometry.lane_width / 2
            };
            out.push(line(geometry, lane, cx, 0, ix, mid));
            out.push(line(geometry, lane, ix, mid, my_x, mid));
        } else {
            out.push(line(geometry, lane, cx, 0, my_x, mid));
        }
        max_center = max_center.max(cx);
    }

    let dot = geometry.dot_size();
    let dot_x = my_x - dot / 2 - 1;
    let dot_y = (h - dot) / 2;

    if commit.has_incoming() {
        out.push(line(geometry, commit.lane, my_x, 0, my_x, mid));
    }

    if !commit.parent_lanes.is_empty() {
        out.push(line(geometry, commit.lane, my_x, mid, my_x, h));
    }

    for &lane in commit.forking_lanes() {
        let cx = geometry.lane_center(lane);
        if (cx - my_x).abs() > geometry.lane_width {
            let ix = if my_x < cx {
                cx - geometry.lane_width / 2
            } else {
                cx + geometry.lane_width / 2
            };
            out.push(line(geometry, lane, my_x, mid, ix, mid));
            out.push(line(geometry, lane, ix, mid, cx, h));
        } else {
            out.push(line(geometry, lane, my_x, mid, cx, h));
        }
        max_center = max_center.max(cx);
    }

    if commit.boundary {
        out.push(DrawInstruction::BoundaryDot {
            x: dot_x,
            y: dot_y,
            w: dot,
            h: dot,
        });
    } else {
        out.push(DrawInstruction::CommitDot {
            x: dot_x,
            y: dot_y,
            w: dot,
            h: dot,
        });
    }

    let text_x = (max_center + geometry.lane_width / 2).max(dot_x + dot) + geometry.text_gap;
    for label in &commit.refs {
        out.push(DrawInstruction::Label {
            x: text_x,
            y: mid,
            label: label.clone(),
        });
    }
    out.push(DrawInstruction::Text {
        x: text_x,
        y: mid,
        message: commit.short_message().to_string(),
    });

    out
}

fn line(geometry: &PlotGeometry, lane: PlotLane, x1: i32, y1: i32, x2: i32, y2: i32) -> DrawInstruction {
    DrawInstruction::Line {
        lane,
        x1,
        y1,
        x2,
        y2,
        width: geometry.line_width,
    }
}
