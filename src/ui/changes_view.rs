use crate::git::{StatusKind, TextDiff};
use crate::models::{Change, ChangeType, EditType};
use crate::state::AppState;
use eframe::egui;

fn change_symbol(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Added => "A",
        ChangeType::Deleted => "D",
        ChangeType::Modified => "M",
        ChangeType::Renamed => "R",
        ChangeType::Copied => "C",
        ChangeType::Typechange => "T",
    }
}

fn status_color(kind: StatusKind) -> egui::Color32 {
    match kind {
        StatusKind::MergeConflict => egui::Color32::from_rgb(220, 50, 50),
        StatusKind::Added | StatusKind::Staged => egui::Color32::from_rgb(0, 150, 0),
        StatusKind::Removed | StatusKind::Missing => egui::Color32::from_rgb(150, 0, 0),
        StatusKind::Modified => egui::Color32::from_rgb(255, 165, 0),
        StatusKind::Untracked => egui::Color32::GRAY,
    }
}

fn edit_colors(edit: EditType) -> (egui::Color32, egui::Color32) {
    match edit {
        EditType::Unchanged => (egui::Color32::TRANSPARENT, egui::Color32::TRANSPARENT),
        EditType::Inserted => (
            egui::Color32::TRANSPARENT,
            egui::Color32::from_rgba_unmultiplied(0, 100, 0, 30),
        ),
        EditType::Deleted => (
            egui::Color32::from_rgba_unmultiplied(100, 0, 0, 30),
            egui::Color32::TRANSPARENT,
        ),
        EditType::Replaced => (
            egui::Color32::from_rgba_unmultiplied(100, 0, 0, 30),
            egui::Color32::from_rgba_unmultiplied(0, 100, 0, 30),
        ),
    }
}

/// Working tree status, the paths touched by the selected commit and a
/// side-by-side diff of one of them
#[derive(Default)]
pub struct ChangesView {
    selected: Option<Change>,
    diff: Option<TextDiff>,
}

impl ChangesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        if let Some(change) = &self.selected {
            if !state.changes.contains(change) {
                self.selected = None;
                self.diff = None;
            }
        }

        ui.heading("Working tree");
        if state.is_scanning() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Scanning...");
            });
        }
        egui::ScrollArea::vertical()
            .id_salt("status_scroll")
            .max_height(160.0)
            .show(ui, |ui| {
                for status in &state.statuses {
                    ui.colored_label(
                        status_color(status.kind),
                        format!("{:?}  {}", status.kind, status.path),
                    );
                }
            });

        ui.separator();
        ui.heading("Commit");
        if let Some(commit) = state.selected_plot_commit() {
            ui.monospace(&commit.commit.short_id);
            ui.label(commit.commit.author.display());
            ui.label(&commit.commit.summary);
        } else {
            ui.label("No commit selected");
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("changes_scroll")
            .max_height(200.0)
            .show(ui, |ui| {
                for change in &state.changes {
                    let text = match &change.old_path {
                        Some(old) => format!("{}  {} -> {}", change_symbol(change.change_type), old, change.path),
                        None => format!("{}  {}", change_symbol(change.change_type), change.path),
                    };
                    let is_selected = self.selected.as_ref() == Some(change);
                    if ui.selectable_label(is_selected, text).clicked() {
                        clicked = Some(change.clone());
                    }
                }
            });

        if let Some(change) = clicked {
            self.diff = state.change_diff(&change);
            self.selected = Some(change);
        }

        if let Some(diff) = &self.diff {
            ui.separator();
            Self::show_diff(ui, diff);
        }
    }

    fn show_diff(ui: &mut egui::Ui, diff: &TextDiff) {
        let (removed, added) = diff.line_counts();
        ui.label(format!("-{} +{}", removed, added));

        egui::ScrollArea::both().id_salt("diff_scroll").show(ui, |ui| {
            egui::Grid::new("diff_grid").num_columns(2).striped(false).show(ui, |ui| {
                for section in diff.sections() {
                    let (color_a, color_b) = edit_colors(section.edit);
                    Self::show_side(ui, &section.aligned_text_a(), color_a);
                    Self::show_side(ui, &section.aligned_text_b(), color_b);
                    ui.end_row();
                }
            });
        });
    }

    fn show_side(ui: &mut egui::Ui, text: &str, background: egui::Color32) {
        egui::Frame::new().fill(background).show(ui, |ui| {
            ui.monospace(text);
        });
    }
}
