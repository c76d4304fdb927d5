use crate::git::error_handling::InputValidator;
use crate::git::GitRepository;
use crate::models::{Change, ChangeType, DiffSection, EditType};
use anyhow::Result;
use similar::DiffTag;

/// Bytes inspected when guessing whether content is binary
pub const BINARY_PROBE_LEN: usize = 8000;

/// Same heuristic as git: a NUL byte near the start means binary
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_PROBE_LEN).any(|&b| b == 0)
}

fn binary_placeholder(size: usize) -> String {
    format!("Binary content\nFile size: {}", size)
}

/// Line diff of two texts as aligned sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDiff {
    sections: Vec<DiffSection>,
}

impl TextDiff {
    pub fn new(a: &str, b: &str) -> Self {
        let diff = similar::TextDiff::from_lines(a, b);
        let old = diff.old_slices();
        let new = diff.new_slices();

        let sections = diff
            .ops()
            .iter()
            .map(|op| {
                let (tag, range_a, range_b) = op.as_tag_tuple();
                let edit = match tag {
                    DiffTag::Equal => EditType::Unchanged,
                    DiffTag::Delete => EditType::Deleted,
                    DiffTag::Insert => EditType::Inserted,
                    DiffTag::Replace => EditType::Replaced,
                };
                DiffSection {
                    edit,
                    begin_a: range_a.start,
                    end_a: range_a.end,
                    begin_b: range_b.start,
                    end_b: range_b.end,
                    text_a: old[range_a].concat(),
                    text_b: new[range_b].concat(),
                }
            })
            .collect();

        Self { sections }
    }

    /// Diff raw blob contents. A binary side is replaced by a short
    /// description of its size.
    pub fn for_display(a: &[u8], b: &[u8]) -> Self {
        let side = |bytes: &[u8]| {
            if is_binary(bytes) {
                binary_placeholder(bytes.len())
            } else {
                String::from_utf8_lossy(bytes).into_owned()
            }
        };
        Self::new(&side(a), &side(b))
    }

    pub fn sections(&self) -> &[DiffSection] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<DiffSection> {
        self.sections
    }

    pub fn has_changes(&self) -> bool {
        self.sections.iter().any(|s| s.edit != EditType::Unchanged)
    }

    /// Lines removed from and added to side A
    pub fn line_counts(&self) -> (usize, usize) {
        self.sections
            .iter()
            .filter(|s| s.edit != EditType::Unchanged)
            .fold((0, 0), |(removed, added), s| (removed + s.lines_a(), added + s.lines_b()))
    }
}

fn change_type(delta: git2::Delta) -> ChangeType {
    match delta {
        git2::Delta::Added => ChangeType::Added,
        git2::Delta::Deleted => ChangeType::Deleted,
        git2::Delta::Renamed => ChangeType::Renamed,
        git2::Delta::Copied => ChangeType::Copied,
        git2::Delta::Typechange => ChangeType::Typechange,
        _ => ChangeType::Modified,
    }
}

fn blob_id(file: &git2::DiffFile<'_>) -> Option<String> {
    let id = file.id();
    (!id.is_zero()).then(|| id.to_string())
}

impl GitRepository {
    /// Paths changed from commit `a` to commit `b`. Without `a` the first
    /// parent of `b` is used, or the empty tree for a root commit.
    pub fn commit_changes(&self, a: Option<&str>, b: &str) -> Result<Vec<Change>> {
        InputValidator::validate_commit_id(b)?;
        let new_commit = self.repo().revparse_single(b)?.peel_to_commit()?;
        let old_tree = match a {
            Some(a) => {
                InputValidator::validate_commit_id(a)?;
                Some(self.repo().revparse_single(a)?.peel_to_tree()?)
            }
            None if new_commit.parent_count() > 0 => Some(new_commit.parent(0)?.tree()?),
            None => None,
        };

        let mut diff = self
            .repo()
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_commit.tree()?), None)?;
        diff.find_similar(None)?;

        let changes = diff
            .deltas()
            .map(|delta| {
                let old_path = delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().into_owned());
                let new_path = delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().into_owned());
                let change_type = change_type(delta.status());
                let moved = matches!(change_type, ChangeType::Renamed | ChangeType::Copied);

                Change {
                    path: new_path.clone().or_else(|| old_path.clone()).unwrap_or_default(),
                    old_path: if moved { old_path } else { None },
                    change_type,
                    old_blob: blob_id(&delta.old_file()),
                    new_blob: blob_id(&delta.new_file()),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!("{} paths changed in {}", changes.len(), b);
        Ok(changes)
    }

    /// Side-by-side diff of one change. Blobs larger than `max_bytes` are
    /// summarized from their object headers without being read.
    pub fn change_diff(&self, change: &Change, max_bytes: usize) -> Result<TextDiff> {
        let old_size = self.blob_size(change.old_blob.as_deref())?;
        let new_size = self.blob_size(change.new_blob.as_deref())?;

        if old_size > max_bytes || new_size > max_bytes {
            tracing::debug!("{} too large to diff ({} / {} bytes)", change.path, old_size, new_size);
            let summary = |size: usize| format!("File too large\nFile size: {}", size);
            return Ok(TextDiff::new(&summary(old_size), &summary(new_size)));
        }

        let old = self.blob_content(change.old_blob.as_deref())?;
        let new = self.blob_content(change.new_blob.as_deref())?;
        Ok(TextDiff::for_display(&old, &new))
    }

    fn blob_size(&self, id: Option<&str>) -> Result<usize> {
        match id {
            Some(id) => {
                let (size, _) = self.repo().odb()?.read_header(git2::Oid::from_str(id)?)?;
                Ok(size)
            }
            None => Ok(0),
        }
    }

    fn blob_content(&self, id: Option<&str>) -> Result<Vec<u8>> {
        match id {
            Some(id) => {
                let blob = self.repo().find_blob(git2::Oid::from_str(id)?)?;
                Ok(blob.content().to_vec())
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn edits(diff: &TextDiff) -> Vec<(EditType, usize, usize, usize, usize)> {
        diff.sections()
            .iter()
            .map(|s| (s.edit, s.begin_a, s.end_a, s.begin_b, s.end_b))
            .collect()
    }

    #[test]
    fn test_replaced_line() {
        let diff = TextDiff::new("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            edits(&diff),
            vec![
                (EditType::Unchanged, 0, 1, 0, 1),
                (EditType::Replaced, 1, 2, 1, 2),
                (EditType::Unchanged, 2, 3, 2, 3),
            ]
        );
        assert_eq!(diff.sections()[1].text_a, "b\n");
        assert_eq!(diff.sections()[1].text_b, "x\n");
        assert_eq!(diff.line_counts(), (1, 1));
    }

    #[test]
    fn test_inserted_and_deleted_lines() {
        let inserted = TextDiff::new("a\n", "a\nb\n");
        assert_eq!(
            edits(&inserted),
            vec![(EditType::Unchanged, 0, 1, 0, 1), (EditType::Inserted, 1, 1, 1, 2)]
        );

        let deleted = TextDiff::new("a\nb\n", "b\n");
        assert_eq!(
            edits(&deleted),
            vec![(EditType::Deleted, 0, 1, 0, 0), (EditType::Unchanged, 1, 2, 0, 1)]
        );
    }

    #[test]
    fn test_identical_and_empty() {
        let same = TextDiff::new("x\ny\n", "x\ny\n");
        assert!(!same.has_changes());
        assert_eq!(same.sections().len(), 1);
        assert!(TextDiff::new("", "").sections().is_empty());
    }

    #[test]
    fn test_binary_detection() {
        assert!(is_binary(b"abc\0def"));
        assert!(!is_binary(b"plain text\n"));

        let mut late_nul = vec![b'a'; BINARY_PROBE_LEN];
        late_nul.push(0);
        assert!(!is_binary(&late_nul));
    }

    #[test]
    fn test_binary_side_is_summarized() {
        let diff = TextDiff::for_display(b"abc", b"a\0c");
        assert_eq!(diff.sections().len(), 1);
        let section = &diff.sections()[0];
        assert_eq!(section.edit, EditType::Replaced);
        assert_eq!(section.text_a, "abc");
        assert_eq!(section.text_b, "Binary content\nFile size: 3");
    }
}
