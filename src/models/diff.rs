use serde::{Deserialize, Serialize};

/// How a section of the compared text relates to the original side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditType {
    Unchanged,
    Inserted,
    Deleted,
    Replaced,
}

/// One aligned block of a two-sided diff.
///
/// Line ranges are half-open and zero based. `text_a` / `text_b` hold the raw
/// lines of each side, including their terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSection {
    pub edit: EditType,
    pub begin_a: usize,
    pub end_a: usize,
    pub begin_b: usize,
    pub end_b: usize,
    pub text_a: String,
    pub text_b: String,
}

impl DiffSection {
    pub fn lines_a(&self) -> usize {
        self.end_a - self.begin_a
    }

    pub fn lines_b(&self) -> usize {
        self.end_b - self.begin_b
    }

    /// Side A text padded with blank lines so both sides of the section span
    /// the same number of rows in a side-by-side view.
    pub fn aligned_text_a(&self) -> String {
        pad_block(&self.text_a, self.lines_a(), self.lines_b())
    }

    pub fn aligned_text_b(&self) -> String {
        pad_block(&self.text_b, self.lines_b(), self.lines_a())
    }
}

fn pad_block(text: &str, own_lines: usize, other_lines: usize) -> String {
    let mut block = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
        .to_string();

    // An empty side still renders one (blank) row of its own.
    let rows = own_lines.max(1);
    let target = own_lines.max(other_lines).max(1);
    for _ in rows..target {
        block.push('\n');
    }
    block
}

/// Change of a single path between two trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Typechange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: String,
    pub old_path: Option<String>,
    pub change_type: ChangeType,
    /// Blob on the reference side, `None` when the path was added
    pub old_blob: Option<String>,
    /// Blob on the compared side, `None` when the path was deleted
    pub new_blob: Option<String>,
}
