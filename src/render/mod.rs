//! Drawing back ends for the commit graph.
//!
//! [`paint_commit`] walks the instructions produced by
//! [`plot_instructions`](crate::graph::plot_instructions) and forwards them to a
//! [`PlotRenderer`]. The retained [`scene::SceneRenderer`], the immediate
//! [`painter::PainterRenderer`] and the console [`text::TextRenderer`] all share
//! that one driver, so the layout math lives in a single place.

pub mod painter;
pub mod scene;
pub mod text;

use crate::graph::{plot_instructions, DrawInstruction, PlotCommit, PlotCommitList, PlotGeometry, PlotLane};
use crate::models::{GitRef, RefType};
use egui::Color32;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Width the graphical renderers reserve for one ref label
pub const LABEL_WIDTH: i32 = 100;

/// Approximate advance of one character of label or message text
pub const CHAR_WIDTH: i32 = 7;

/// Color used for truncated-history markers
pub const BOUNDARY_COLOR: Color32 = Color32::from_rgb(220, 50, 50);

/// Background of a highlighted commit message
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(192, 192, 192);

/// Lane colors, cycled by lane position
pub const DEFAULT_PALETTE: [Color32; 24] = [
    Color32::from_rgb(220, 38, 127),
    Color32::from_rgb(52, 168, 83),
    Color32::from_rgb(66, 133, 244),
    Color32::from_rgb(251, 188, 5),
    Color32::from_rgb(156, 39, 176),
    Color32::from_rgb(255, 87, 34),
    Color32::from_rgb(0, 172, 193),
    Color32::from_rgb(139, 195, 74),
    Color32::from_rgb(255, 112, 67),
    Color32::from_rgb(92, 107, 192),
    Color32::from_rgb(174, 213, 129),
    Color32::from_rgb(255, 183, 77),
    Color32::from_rgb(240, 98, 146),
    Color32::from_rgb(129, 199, 132),
    Color32::from_rgb(100, 181, 246),
    Color32::from_rgb(171, 71, 188),
    Color32::from_rgb(255, 138, 101),
    Color32::from_rgb(149, 117, 205),
    Color32::from_rgb(102, 187, 106),
    Color32::from_rgb(255, 202, 40),
    Color32::from_rgb(179, 136, 255),
    Color32::from_rgb(255, 171, 145),
    Color32::from_rgb(130, 177, 255),
    Color32::from_rgb(165, 214, 167),
];

/// Everything the layout needs from a drawing surface.
///
/// Coordinates handed to the draw calls are row-local; `begin_row` tells the
/// renderer which row they belong to.
pub trait PlotRenderer {
    type Color: Clone;

    fn lane_color(&self, lane: PlotLane) -> Self::Color;

    fn begin_row(&mut self, _row: usize, _commit: &PlotCommit) {}

    fn draw_line(&mut self, color: Self::Color, x1: i32, y1: i32, x2: i32, y2: i32, width: i32);

    fn draw_commit_dot(&mut self, x: i32, y: i32, w: i32, h: i32);

    fn draw_boundary_dot(&mut self, x: i32, y: i32, w: i32, h: i32);

    /// Draw `label` starting at `x` and return the width it took
    fn draw_label(&mut self, x: i32, y: i32, label: &GitRef) -> i32;

    fn draw_text(&mut self, message: &str, x: i32, y: i32);
}

/// Paint one commit row
pub fn paint_commit<R: PlotRenderer + ?Sized>(renderer: &mut R, commit: &PlotCommit, geometry: &PlotGeometry) {
    renderer.begin_row(commit.row, commit);

    let mut advance = 0;
    for instruction in plot_instructions(commit, geometry) {
        match instruction {
            DrawInstruction::Line {
                lane,
                x1,
                y1,
                x2,
                y2,
                width,
            } => {
                let color = renderer.lane_color(lane);
                renderer.draw_line(color, x1, y1, x2, y2, width);
            }
            DrawInstruction::CommitDot { x, y, w, h } => renderer.draw_commit_dot(x, y, w, h),
            DrawInstruction::BoundaryDot { x, y, w, h } => renderer.draw_boundary_dot(x, y, w, h),
            DrawInstruction::Label { x, y, label } => {
                let width = renderer.draw_label(x + advance, y, &label);
                advance += width + geometry.label_spacing;
            }
            DrawInstruction::Text { x, y, message } => {
                renderer.draw_text(&message, x + advance, y);
            }
        }
    }
}

/// Paint every row of `list` top to bottom
pub fn paint_list<R: PlotRenderer + ?Sized>(renderer: &mut R, list: &PlotCommitList, geometry: &PlotGeometry) {
    for commit in list {
        paint_commit(renderer, commit, geometry);
    }
}

pub fn palette_color(palette: &[Color32], lane: PlotLane) -> Color32 {
    palette
        .get(lane.color_index(palette.len()))
        .copied()
        .unwrap_or(Color32::GRAY)
}

/// Parse `#rrggbb` or `#rrggbbaa`
pub fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.trim().strip_prefix('#').unwrap_or(text.trim());
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}

pub fn to_hex_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Shorten `text` to `max_chars`, marking the cut with an ellipsis
pub fn fit_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Characters of a ref name that fit into [`LABEL_WIDTH`]
pub fn label_chars() -> usize {
    ((LABEL_WIDTH - 8) / CHAR_WIDTH).max(1) as usize
}

/// User rule coloring refs whose full name matches `pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelColorRule {
    pub pattern: String,
    pub color: String,
}

/// Background colors for ref labels
#[derive(Debug, Clone, Default)]
pub struct LabelColors {
    rules: Vec<(Regex, Color32)>,
}

impl LabelColors {
    /// Compile `rules`, skipping invalid patterns and colors
    pub fn from_rules(rules: &[LabelColorRule]) -> Self {
        let mut compiled = Vec::new();
        for rule in rules {
            let Some(color) = parse_hex_color(&rule.color) else {
                tracing::warn!("Ignoring label rule {}: bad color {}", rule.pattern, rule.color);
                continue;
            };
            match Regex::new(&rule.pattern) {
                Ok(regex) => compiled.push((regex, color)),
                Err(e) => tracing::warn!("Ignoring label rule {}: {}", rule.pattern, e),
            }
        }
        Self { rules: compiled }
    }

    pub fn color_for(&self, label: &GitRef) -> Color32 {
        if let Some((_, color)) = self.rules.iter().find(|(regex, _)| regex.is_match(&label.full_name)) {
            return *color;
        }
        match label.ref_type {
            RefType::LocalBranch | RefType::Head => Color32::from_rgb(100, 255, 100),
            RefType::Tag => Color32::from_rgb(255, 255, 100),
            RefType::RemoteBranch | RefType::Other => Color32::from_rgb(100, 150, 255),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::graph::{CommitGraph, DEFAULT_FILL_LIMIT};
    use crate::models::GitCommit;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// Records every call as a line of text
    #[derive(Default)]
    pub(crate) struct RecordingRenderer {
        pub calls: Vec<String>,
        pub label_width: i32,
    }

    impl PlotRenderer for RecordingRenderer {
        type Color = usize;

        fn lane_color(&self, lane: PlotLane) -> usize {
            lane.color_index(DEFAULT_PALETTE.len())
        }

        fn begin_row(&mut self, row: usize, _commit: &PlotCommit) {
            self.calls.push(format!("row {}", row));
        }

        fn draw_line(&mut self, color: usize, x1: i32, y1: i32, x2: i32, y2: i32, width: i32) {
            self.calls
                .push(format!("line {} {},{} {},{} {}", color, x1, y1, x2, y2, width));
        }

        fn draw_commit_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.calls.push(format!("dot {},{} {}x{}", x, y, w, h));
        }

        fn draw_boundary_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
            self.calls.push(format!("boundary {},{} {}x{}", x, y, w, h));
        }

        fn draw_label(&mut self, x: i32, _y: i32, label: &GitRef) -> i32 {
            self.calls.push(format!("label {} {}", x, label.name));
            self.label_width
        }

        fn draw_text(&mut self, message: &str, x: i32, _y: i32) {
            self.calls.push(format!("text {} {}", x, message));
        }
    }

    #[test]
    fn test_labels_advance_text() {
        let graph = CommitGraph::new(vec![GitCommit::synthetic("a", &[], 1)]).with_refs(vec![
            GitRef::new("refs/heads/main", "a"),
            GitRef::new("refs/tags/v1", "a"),
        ]);
        let list = PlotCommitList::build(&mut graph.walk(&[]), DEFAULT_FILL_LIMIT);
        let mut renderer = RecordingRenderer {
            label_width: LABEL_WIDTH,
            ..Default::default()
        };
        paint_list(&mut renderer, &list, &PlotGeometry::pixels());

        assert_eq!(
            renderer.calls,
            vec![
                "row 0".to_string(),
                "dot 4,6 8x8".to_string(),
                "label 24 main".to_string(),
                "label 126 v1".to_string(),
                "text 228 commit a".to_string(),
            ]
        );
    }

    #[test]
    fn test_lines_use_lane_colors() {
        let graph = CommitGraph::new(vec![
            GitCommit::synthetic("p1", &[], 1),
            GitCommit::synthetic("p2", &[], 2),
            GitCommit::synthetic("m", &["p1", "p2"], 3),
        ]);
        let list = PlotCommitList::build(&mut graph.walk(&[]), DEFAULT_FILL_LIMIT);
        let mut renderer = RecordingRenderer::default();
        paint_commit(&mut renderer, list.get(0).unwrap(), &PlotGeometry::pixels());

        assert_eq!(renderer.calls[1], "line 0 9,10 9,20 2");
        assert_eq!(renderer.calls[2], "line 1 9,10 23,20 2");
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_color(&DEFAULT_PALETTE, PlotLane::new(0)), DEFAULT_PALETTE[0]);
        assert_eq!(palette_color(&DEFAULT_PALETTE, PlotLane::new(25)), DEFAULT_PALETTE[1]);
        assert_eq!(palette_color(&[], PlotLane::new(3)), Color32::GRAY);
    }

    #[test_case("#ff0000", Some(Color32::from_rgb(255, 0, 0)) ; "rgb")]
    #[test_case("00ff00", Some(Color32::from_rgb(0, 255, 0)) ; "without hash")]
    #[test_case("#0000ff80", Some(Color32::from_rgba_unmultiplied(0, 0, 255, 128)) ; "rgba")]
    #[test_case("#12345", None ; "short")]
    #[test_case("#gg0000", None ; "not hex")]
    fn test_parse_hex_color(input: &str, expected: Option<Color32>) {
        assert_eq!(parse_hex_color(input), expected);
    }

    #[test]
    fn test_hex_round_trip_for_palette() {
        for color in DEFAULT_PALETTE {
            assert_eq!(parse_hex_color(&to_hex_color(color)), Some(color));
        }
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("main", 13), "main");
        assert_eq!(fit_text("feature/very-long-name", 8), "feature…");
    }

    #[test]
    fn test_label_colors_rules_then_type() {
        let colors = LabelColors::from_rules(&[
            LabelColorRule {
                pattern: "^refs/heads/release/".to_string(),
                color: "#ff8800".to_string(),
            },
            LabelColorRule {
                pattern: "(".to_string(),
                color: "#000000".to_string(),
            },
        ]);

        assert_eq!(
            colors.color_for(&GitRef::new("refs/heads/release/1.0", "a")),
            Color32::from_rgb(255, 136, 0)
        );
        assert_eq!(
            colors.color_for(&GitRef::new("refs/heads/main", "a")),
            Color32::from_rgb(100, 255, 100)
        );
        assert_eq!(
            colors.color_for(&GitRef::new("refs/tags/v1", "a")),
            Color32::from_rgb(255, 255, 100)
        );
        assert_eq!(
            colors.color_for(&GitRef::new("refs/remotes/origin/main", "a")),
            Color32::from_rgb(100, 150, 255)
        );
    }
}
