use crate::graph::{PlotCommit, PlotCommitList, PlotGeometry, PlotLane};
use crate::models::GitRef;
use crate::render::scene::{RowFrame, SceneShape};
use crate::render::{paint_list, palette_color, LabelColors, PlotRenderer, BOUNDARY_COLOR, LABEL_WIDTH};
use egui::{Color32, Pos2};

/// Paints rows straight into an `egui::Painter` without keeping anything
/// around. Used for previews where nothing is clickable.
pub struct PainterRenderer<'p> {
    painter: &'p egui::Painter,
    origin: Pos2,
    palette: &'p [Color32],
    label_colors: &'p LabelColors,
    geometry: PlotGeometry,
    text_color: Color32,
    frame: RowFrame,
    current_lane: PlotLane,
}

impl<'p> PainterRenderer<'p> {
    pub fn new(
        painter: &'p egui::Painter,
        origin: Pos2,
        palette: &'p [Color32],
        label_colors: &'p LabelColors,
    ) -> Self {
        Self {
            painter,
            origin,
            palette,
            label_colors,
            geometry: PlotGeometry::pixels(),
            text_color: Color32::LIGHT_GRAY,
            frame: RowFrame::default(),
            current_lane: PlotLane::new(0),
        }
    }

    pub fn with_geometry(mut self, geometry: PlotGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_text_color(mut self, color: Color32) -> Self {
        self.text_color = color;
        self
    }

    /// Paint the whole list
    pub fn paint(&mut self, list: &PlotCommitList) {
        let geometry = self.geometry;
        paint_list(self, list, &geometry);
    }

    fn put(&self, shape: SceneShape, color: Color32) {
        shape.paint(self.painter, self.origin.to_vec2(), color, false);
    }
}

impl PlotRenderer for PainterRenderer<'_> {
    type Color = Color32;

    fn lane_color(&self, lane: PlotLane) -> Color32 {
        palette_color(self.palette, lane)
    }

    fn begin_row(&mut self, row: usize, commit: &PlotCommit) {
        self.frame = RowFrame::for_row(row, &self.geometry);
        self.current_lane = commit.lane;
    }

    fn draw_line(&mut self, color: Color32, x1: i32, y1: i32, x2: i32, y2: i32, width: i32) {
        self.put(self.frame.line(x1, y1, x2, y2, width), color);
    }

    fn draw_commit_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let rect = self.frame.dot_rect(x, y, w, h);
        self.put(SceneShape::Dot { rect }, self.lane_color(self.current_lane));
    }

    fn draw_boundary_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let rect = self.frame.dot_rect(x, y, w, h);
        self.put(SceneShape::BoundaryDot { rect }, BOUNDARY_COLOR);
    }

    fn draw_label(&mut self, x: i32, y: i32, label: &GitRef) -> i32 {
        self.put(self.frame.label(x, y, label), self.label_colors.color_for(label));
        LABEL_WIDTH
    }

    fn draw_text(&mut self, message: &str, x: i32, y: i32) {
        self.put(self.frame.text(x, y, message), self.text_color);
    }
}
