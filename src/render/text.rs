use crate::graph::{PlotCommit, PlotCommitList, PlotGeometry, PlotLane};
use crate::models::GitRef;
use crate::render::{paint_list, PlotRenderer};

// Lane centers fall on odd x in the text geometry; shift them to column 0.
const COLUMN_OFFSET: i32 = 1;

/// Draws the graph as characters, two lines per commit:
///
/// ```text
/// *   commit c4
/// |\
/// | * commit c3
/// ```
#[derive(Debug)]
pub struct TextRenderer {
    geometry: PlotGeometry,
    grid: Vec<Vec<char>>,
    top: i32,
    graph_columns: i32,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            geometry: PlotGeometry::text(),
            grid: Vec::new(),
            top: 0,
            graph_columns: 0,
        }
    }

    pub fn render(&mut self, list: &PlotCommitList) {
        let geometry = self.geometry;
        paint_list(self, list, &geometry);
    }

    /// The drawn graph, right-trimmed, without leading or trailing blank lines
    pub fn output(&self) -> String {
        let tidied = self.tidied();
        let lines: Vec<String> = tidied
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();

        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }

    fn cell(&self, column: i32, line: i32) -> char {
        if column < 0 || line < 0 {
            return ' ';
        }
        self.grid
            .get(line as usize)
            .and_then(|row| row.get(column as usize))
            .copied()
            .unwrap_or(' ')
    }

    /// Write `ch` at layout position `(x, y)` of the current row. Weak
    /// characters only fill empty cells.
    fn put(&mut self, x: i32, y: i32, ch: char, strong: bool) {
        let column = x - COLUMN_OFFSET;
        let line = self.top + y;
        if column < 0 || line < 0 {
            return;
        }
        let (column, line) = (column as usize, line as usize);
        if self.grid.len() <= line {
            self.grid.resize_with(line + 1, Vec::new);
        }
        let row = &mut self.grid[line];
        if row.len() <= column {
            row.resize(column + 1, ' ');
        }
        if strong || row[column] == ' ' {
            row[column] = ch;
        }
    }

    fn put_graph(&mut self, x: i32, y: i32, ch: char, strong: bool) {
        self.graph_columns = self.graph_columns.max(x - COLUMN_OFFSET + 1);
        self.put(x, y, ch, strong);
    }

    fn put_str(&mut self, x: i32, y: i32, text: &str) -> i32 {
        let mut width = 0;
        for ch in text.chars() {
            self.put(x + width, y, ch, true);
            width += 1;
        }
        width
    }

    /// Drop bars that only duplicate the start or end of a diagonal
    fn tidied(&self) -> Vec<Vec<char>> {
        let continues = |ch: char| matches!(ch, '|' | '*' | 'o');
        let mut grid = self.grid.clone();
        for (line, row) in self.grid.iter().enumerate() {
            for (column, &ch) in row.iter().enumerate() {
                if ch != '|' || column as i32 >= self.graph_columns {
                    continue;
                }
                let (c, l) = (column as i32, line as i32);
                let left = self.cell(c - 1, l);
                let right = self.cell(c + 1, l);
                let ends_here = (left == '/' || right == '\\') && !continues(self.cell(c, l + 1));
                let starts_here = (left == '\\' || right == '/') && !continues(self.cell(c, l - 1));
                if ends_here || starts_here {
                    grid[line][column] = ' ';
                }
            }
        }
        grid
    }
}

impl PlotRenderer for TextRenderer {
    type Color = ();

    fn lane_color(&self, _lane: PlotLane) {}

    fn begin_row(&mut self, row: usize, _commit: &PlotCommit) {
        self.top = row as i32 * self.geometry.row_height;
    }

    fn draw_line(&mut self, _color: (), x1: i32, y1: i32, x2: i32, y2: i32, _width: i32) {
        let (dx, dy) = (x2 - x1, y2 - y1);
        if dx == 0 {
            for y in y1.min(y2)..=y1.max(y2) {
                self.put_graph(x1, y, '|', false);
            }
            return;
        }
        if dy == 0 {
            for x in x1.min(x2)..=x1.max(x2) {
                self.put_graph(x, y1, '-', false);
            }
            return;
        }

        let ch = if (dx > 0) == (dy > 0) { '\\' } else { '/' };
        if dy.abs() == 1 {
            // One step down: the glyph goes on the line that is not the
            // commit line, between the two columns.
            let mid = self.geometry.row_height / 2;
            let (y, mid_x) = if y1 != mid { (y1, x2) } else { (y2, x1) };
            let x = if dx.abs() >= 2 { x1 + dx / 2 } else { mid_x };
            self.put_graph(x, y, ch, true);
            return;
        }

        let steps = dy.abs();
        for i in 1..steps {
            let y = y1 + i * dy.signum();
            let x = x1 + dx * i / steps;
            self.put_graph(x, y, ch, true);
        }
    }

    fn draw_commit_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.put_graph(x + w / 2 + 1, y + h / 2, '*', true);
    }

    fn draw_boundary_dot(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.put_graph(x + w / 2 + 1, y + h / 2, 'o', true);
    }

    fn draw_label(&mut self, x: i32, y: i32, label: &GitRef) -> i32 {
        self.put_str(x, y, &format!("({})", label.name))
    }

    fn draw_text(&mut self, message: &str, x: i32, y: i32) {
        self.put_str(x, y, message);
    }
}

/// Render `list` as a console graph
pub fn render_to_string(list: &PlotCommitList) -> String {
    let mut renderer = TextRenderer::new();
    renderer.render(list);
    renderer.output()
}
