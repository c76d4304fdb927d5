use crate::graph::{PlotCommit, PlotCommitList, PlotGeometry, PlotLane};
use crate::models::GitRef;
use crate::render::{
    fit_text, label_chars, paint_list, palette_color, LabelColors, PlotRenderer, BOUNDARY_COLOR, CHAR_WIDTH,
    DEFAULT_PALETTE, HIGHLIGHT_COLOR, LABEL_WIDTH,
};
use egui::{pos2, vec2, Align2, Color32, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind, Vec2};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const LABEL_HEIGHT: f32 = 16.0;
const TEXT_HEIGHT: f32 = 14.0;

/// Geometry of one drawn element, in scene coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum SceneShape {
    Line { from: Pos2, to: Pos2, width: f32 },
    Dot { rect: Rect },
    BoundaryDot { rect: Rect },
    Label { rect: Rect, text: String },
    Text { pos: Pos2, text: String },
}

impl SceneShape {
    pub fn bounds(&self) -> Rect {
        match self {
            SceneShape::Line { from, to, width } => Rect::from_two_pos(*from, *to).expand(width / 2.0),
            SceneShape::Dot { rect } | SceneShape::BoundaryDot { rect } | SceneShape::Label { rect, .. } => *rect,
            SceneShape::Text { pos, text } => Rect::from_min_size(
                pos2(pos.x, pos.y - TEXT_HEIGHT / 2.0),
                vec2((text.chars().count() as i32 * CHAR_WIDTH) as f32, TEXT_HEIGHT),
            ),
        }
    }

    /// Paint with the scene translated by `offset`
    pub fn paint(&self, painter: &egui::Painter, offset: Vec2, color: Color32, highlighted: bool) {
        match self {
            SceneShape::Line { from, to, width } => {
                painter.line_segment([*from + offset, *to + offset], Stroke::new(*width, color));
            }
            SceneShape::Dot { rect } | SceneShape::BoundaryDot { rect } => {
                let rect = rect.translate(offset);
                let radius = rect.width() / 2.0;
                painter.circle_filled(rect.center(), radius, color);
                painter.circle_stroke(rect.center(), radius, Stroke::new(1.0, Color32::BLACK));
            }
            SceneShape::Label { rect, text } => {
                let rect = rect.translate(offset);
                painter.rect_filled(rect, 2.0, color);
                painter.rect_stroke(
                    rect,
                    CornerRadius::same(2),
                    Stroke::new(1.0, Color32::BLACK),
                    StrokeKind::Outside,
                );
                painter.text(
                    rect.left_center() + vec2(4.0, 0.0),
                    Align2::LEFT_CENTER,
                    text,
                    FontId::monospace(10.0),
                    Color32::BLACK,
                );
            }
            SceneShape::Text { pos, text } => {
                let text_color = if highlighted {
                    painter.rect_filled(self.bounds().translate(offset), 0.0, HIGHLIGHT_COLOR);
                    Color32::BLACK
                } else {
                    color
                };
                painter.text(
                    *pos + offset,
                    Align2::LEFT_CENTER,
                    text,
                    FontId::proportional(12.0),
                    text_color,
                );
            }
        }
    }
}

/// Maps row-local layout coordinates onto scene coordinates
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RowFrame {
    pub top: f32,
}

impl RowFrame {
    pub fn for_row(row: usize, geometry: &PlotGeometry) -> Self {
        Self {
            top: (row as i32 * geometry.row_height) as f32,
        }
    }

    fn point(&self, x: i32, y: i32) -> Pos2 {
        pos2(x as f32, self.top + y as f32)
    }

    pub fn line(&self, x1: i32, y1: i32, x2: i32, y2: i32, width: i32) -> SceneShape {
        SceneShape::Line {
            from: self.point(x1, y1),
            to: self.point(x2, y2),
            width: width as f32,
        }
    }

    pub fn dot_rect(&self, x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::from_min_size(self.point(x, y), vec2(w as f32, h as f32))
    }

    pub fn label(&self, x: i32, y: i32, label: &GitRef) -> SceneShape {
        let left_center = self.point(x, y);
        SceneShape::Label {
            rect: Rect::from_min_size(
                pos2(left_center.x, left_center.y - LABEL_HEIGHT / 2.0),
                vec2(LABEL_WIDTH as f32, LABEL_HEIGHT),
            ),
            text: fit_text(&label.name, label_chars()),
        }
    }

    pub fn text(&self, x: i32, y: i32, message: &str) -> SceneShape {
        SceneShape::Text {
            pos: self.point(x, y),
            text: message.to_string(),
        }
    }
}

/// What a clickable element stands for
#[derive(Debug, Clone, PartialEq)]
pub enum ElementTag {
    Commit(String),
    Label(GitRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    pub shape: SceneShape,
    pub color: Color32,
    pub tag: Option<ElementTag>,
    pub highlighted: bool,
}

type CommitListener = Box<dyn FnMut(&PlotCommit)>;
type LabelListener = Box<dyn FnMut(&GitRef)>;

/// Retained renderer: keeps every drawn element so clicks can be mapped back
/// to the commit or ref under the pointer.
pub struct SceneRenderer {
    geometry: PlotGeometry,
    palette: Vec<Color32>,
    label_colors: LabelColors,
    text_color: Color32,
    elements: Vec<SceneElement>,
    dots: HashMap<String, usize>,
    texts: HashMap<String, usize>,
    highlighted: HashSet<String>,
    commits: Vec<PlotCommit>,
    frame: RowFrame,
    current_id: String,
    current_lane: PlotLane,
    commit_listeners: Vec<CommitListener>,
    label_listeners: Vec<LabelListener>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(
            PlotGeometry::pixels(),
            DEFAULT_PALETTE.to_vec(),
            LabelColors::default(),
        )
    }
}

impl SceneRenderer {
    pub fn new(geometry: PlotGeometry, palette: Vec<Color32>, label_colors: LabelColors) -> Self {
        Self {
            geometry,
            palette,
            label_colors,
            text_color: Color32::LIGHT_GRAY,
            elements: Vec::new(),
            dots: HashMap::new(),
            texts: HashMap::new(),
            highlighted: HashSet::new(),
            commits: Vec::new(),
            frame: RowFrame::default(),
            current_id: String::new(),
            current_lane: PlotLane::new(0),
            commit_listeners: Vec::new(),
            label_listeners: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PlotGeometry {
        &self.geometry
    }

    pub fn set_text_color(&mut self, color: Color32) {
        self.text_color = color;
        for element in &mut self.elements {
            if matches!(element.shape, SceneShape::Text { .. }) {
                element.color = color;
            }
        }
    }

    pub fn on_commit_clicked(&mut self, listener: impl FnMut(&PlotCommit) + 'static) {
        self.commit_listeners.push(Box::new(listener));
    }

    pub fn on_label_clicked(&mut self, listener: impl FnMut(&GitRef) + 'static) {
        self.label_listeners.push(Box::new(listener));
    }

    /// Throw away the current scene and draw `list` from scratch
    pub fn update(&mut self, list: &PlotCommitList) {
        self.elements.clear();
        self.dots.clear();
        self.texts.clear();
        self.commits = list.as_slice().to_vec();
        let commits = &self.commits;
        self.highlighted.retain(|id| commits.iter().any(|c| c.id() == id.as_str()));

        let geometry = self.geometry;
        paint_list(self, list, &geometry);
        debug!(
            "Scene rebuilt: {} elements for {} commits",
            self.elements.len(),
            self.commits.len()
        );
    }

    /// Route a click at `pos` (scene coordinates) to the listeners. Returns
    /// false when nothing clickable is under the pointer.
    pub fn click(&mut self, pos: Pos2) -> bool {
        let Some(tag) = self
            .elements
            .iter()
            .rev()
            .filter(|e| e.shape.bounds().contains(pos))
            .find_map(|e| e.tag.clone())
        else {
            return false;
        };

        match tag {
            ElementTag::Commit(id) => {
                let Some(commit) = self.commits.iter().find(|c| c.id() == id) else {
                    return false;
                };
                debug!("Commit {} clicked", commit.commit.short_id);
                for listener in &mut self.commit_listeners {
                    listener(commit);
                }
            }
            ElementTag::Label(label) => {
                debug!("Label {} clicked", label.full_name);
                for listener in &mut self.label_listeners {
                    listener(&label);
                }
            }
        }
        true
    }

    /// Highlight the message of commit `id`. The highlight survives updates
    /// that still contain the commit.
    pub fn select(&mut self, id: &str) -> bool {
        let found = self.set_highlight(id, true);
        if found {
            self.highlighted.insert(id.to_string());
        }
        found
    }

    pub fn unselect(&mut self, id: &str) -> bool {
        self.highlighted.remove(id);
        self.set_highlight(id, false)
    }

    fn set_highlight(&mut self, id: &str, on: bool) -> bool {
        match self.texts.get(id).and_then(|&i| self.elements.get_mut(i)) {
            Some(element) => {
                element.highlighted = on;
                true
            }
            None => false,
        }
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn dot_for(&self, id: &str) -> Option<&SceneElement> {
        self.dots.get(id).and_then(|&i| self.elements.get(i))
    }

    pub fn text_for(&self, id: &str) -> Option<&SceneElement> {
        self.texts.get(id).and_then(|&i| self.elements.get(i))
    }

    pub fn height(&self) -> f32 {
        (self.commits.len() as i32 * self.geometry.row_height) as f32
    }

    pub fn width(&self) -> f32 {
        self.elements
            .iter()
            .map(|e| e.shape.bounds().max.x)
            .fold(0.0, f32::max)
    }

    /// Paint the visible part of the scene with its top-left corner at `origin`
    pub fn paint(&self, painter: &egui::Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        let clip = painter.clip_rect();
        for element in &self.elements {
            if !clip.intersects(element.shape.bounds().translate(offset)) {
                continue;
            }
            element
                .shape
                .paint(painter, offset, element.color, element.highlighted);
        }
    }

    fn push(&mut self, shape: SceneShape, color: Color32, tag: Option<ElementTag>) -> usize {
        self.elements.push(SceneElement {
            shape,
            color,
            tag,
            highlighted: false,
        });
        self.elements.len() - 1
    }
}

impl PlotRenderer for SceneRenderer {
    type Color = Color32;

    fn lane_color(&self, lane: PlotLane) -> Color32 {
        palette_color(&self.palette, lane)
    }

    fn begin_row(&mut self, row: usize, commit: &PlotCommit) {
        self.frame = RowFrame::for_row(row, &self.geometry);
        self.current_id = commit.id().to_string();
        self.current_lane = commit.lane;
    }

    fn draw_line(&mut self, color: Color32, x1: i32, y1: i32, x2: i32, y2: i32, width: i32) {
        let shape = self.frame.line(x1, y1, x2, y2, width);
        self.push(shape, color, None);
    }

    fn draw_commit_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let rect = self.frame.dot_rect(x, y, w, h);
        let color = self.lane_color(self.current_lane);
        let tag = ElementTag::Commit(self.current_id.clone());
        let index = self.push(SceneShape::Dot { rect }, color, Some(tag));
        self.dots.insert(self.current_id.clone(), index);
    }

    fn draw_boundary_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let rect = self.frame.dot_rect(x, y, w, h);
        self.push(SceneShape::BoundaryDot { rect }, BOUNDARY_COLOR, None);
    }

    fn draw_label(&mut self, x: i32, y: i32, label: &GitRef) -> i32 {
        let shape = self.frame.label(x, y, label);
        let color = self.label_colors.color_for(label);
        self.push(shape, color, Some(ElementTag::Label(label.clone())));
        LABEL_WIDTH
    }

    fn draw_text(&mut self, message: &str, x: i32, y: i32) {
        let shape = self.frame.text(x, y, message);
        let tag = ElementTag::Commit(self.current_id.clone());
        let index = self.push(shape, self.text_color, Some(tag));
        if self.highlighted.contains(&self.current_id) {
            self.elements[index].highlighted = true;
        }
        self.texts.insert(self.current_id.clone(), index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CommitGraph, DEFAULT_FILL_LIMIT};
    use crate::models::GitCommit;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn diamond_list() -> PlotCommitList {
        let graph = CommitGraph::new(vec![
            GitCommit::synthetic("c1", &[], 1),
            GitCommit::synthetic("c2", &["c1"], 2),
            GitCommit::synthetic("c3", &["c1"], 3),
            GitCommit::synthetic("c4", &["c2", "c3"], 4),
        ])
        .with_refs(vec![GitRef::new("refs/heads/main", "c4")]);
        PlotCommitList::build(&mut graph.walk(&[]), DEFAULT_FILL_LIMIT)
    }

    fn recorded_clicks(scene: &mut SceneRenderer) -> Rc<RefCell<Vec<String>>> {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        scene.on_commit_clicked(move |commit| sink.borrow_mut().push(commit.id().to_string()));
        clicks
    }

    #[test]
    fn test_update_maps_every_commit() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());

        for id in ["c1", "c2", "c3", "c4"] {
            assert!(scene.dot_for(id).is_some(), "missing dot for {}", id);
            assert!(scene.text_for(id).is_some(), "missing text for {}", id);
        }
        assert_eq!(scene.height(), 80.0);
    }

    #[test]
    fn test_rows_are_stacked() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());

        // c2 sits on row 2, lane 0.
        let dot = scene.dot_for("c2").unwrap();
        assert_eq!(
            dot.shape,
            SceneShape::Dot {
                rect: Rect::from_min_size(pos2(4.0, 46.0), vec2(8.0, 8.0))
            }
        );
        assert_eq!(dot.color, DEFAULT_PALETTE[0]);
        assert_eq!(scene.dot_for("c3").unwrap().color, DEFAULT_PALETTE[1]);
    }

    #[test]
    fn test_update_rebuilds_maps() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());

        let graph = CommitGraph::new(vec![GitCommit::synthetic("solo", &[], 1)]);
        scene.update(&PlotCommitList::build(&mut graph.walk(&[]), DEFAULT_FILL_LIMIT));

        assert!(scene.dot_for("c4").is_none());
        assert!(scene.dot_for("solo").is_some());
        assert_eq!(scene.elements().len(), 2);
    }

    #[test]
    fn test_click_on_dot_fires_commit_listener() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());
        let clicks = recorded_clicks(&mut scene);

        let center = scene.dot_for("c3").unwrap().shape.bounds().center();
        assert!(scene.click(center));
        assert_eq!(*clicks.borrow(), vec!["c3".to_string()]);
    }

    #[test]
    fn test_click_on_text_fires_commit_listener() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());
        let clicks = recorded_clicks(&mut scene);

        let pos = scene.text_for("c1").unwrap().shape.bounds().left_center() + vec2(2.0, 0.0);
        assert!(scene.click(pos));
        assert_eq!(*clicks.borrow(), vec!["c1".to_string()]);
    }

    #[test]
    fn test_click_on_line_is_ignored() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());
        let clicks = recorded_clicks(&mut scene);

        // Lane 0 passes through c3's row.
        assert!(!scene.click(pos2(9.0, 22.0)));
        assert!(!scene.click(pos2(500.0, 500.0)));
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn test_click_on_boundary_dot_is_ignored() {
        let graph = CommitGraph::new(vec![GitCommit::synthetic("s", &["gone"], 1)]);
        let mut scene = SceneRenderer::default();
        scene.update(&PlotCommitList::build(&mut graph.walk(&[]), DEFAULT_FILL_LIMIT));
        let clicks = recorded_clicks(&mut scene);

        assert!(scene.dot_for("s").is_none());
        assert!(!scene.click(pos2(8.0, 10.0)));
        assert!(clicks.borrow().is_empty());
    }

    #[test]
    fn test_click_on_label_fires_label_listener() {
        let mut scene = SceneRenderer::default();
        scene.update(&diamond_list());
        let labels = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&labels);
        scene.on_label_clicked(move |label| sink.borrow_mut().push(label.full_name.clone()));
        let commits = recorded_clicks(&mut scene);

        let label = scene
            .elements()
            .iter()
            .find(|e| matches!(e.tag, Some(ElementTag::Label(_))))
            .unwrap();
        let center = label.shape.bounds().center();

        assert!(scene.click(center));
        assert_eq!(*labels.borrow(), vec!["refs/heads/main".to_string()]);
        assert!(commits.borrow().is_empty());
    }

    #[test]
    fn test_selection_highlight_survives_update() {
        let mut scene = SceneRenderer::default();
        let list = diamond_list();
        scene.update(&list);

        assert!(scene.select("c2"));
        assert!(scene.text_for("c2").unwrap().highlighted);
        assert!(!scene.select("missing"));

        scene.update(&list);
        assert!(scene.text_for("c2").unwrap().highlighted);

        assert!(scene.unselect("c2"));
        assert!(!scene.text_for("c2").unwrap().highlighted);
    }

    #[test]
    fn test_highlight_only_tracks_drawn_commits() {
        let mut scene = SceneRenderer::default();
        let full = diamond_list();
        let graph = CommitGraph::new(vec![
            GitCommit::synthetic("c1", &[], 1),
            GitCommit::synthetic("c2", &["c1"], 2),
            GitCommit::synthetic("c3", &["c1"], 3),
            GitCommit::synthetic("c4", &["c2", "c3"], 4),
        ]);
        let partial = PlotCommitList::build(&mut graph.walk(&[]), 2);
        assert!(partial.find("c1").is_none());

        scene.update(&partial);
        assert!(!scene.select("c1"));
        scene.update(&full);
        assert!(!scene.text_for("c1").unwrap().highlighted);

        assert!(scene.select("c1"));
        assert!(scene.select("c4"));
        scene.update(&partial);
        assert!(scene.text_for("c4").unwrap().highlighted);
        scene.update(&full);
        assert!(!scene.text_for("c1").unwrap().highlighted);
        assert!(scene.text_for("c4").unwrap().highlighted);
    }
}
