use crate::state::AppState;
use eframe::egui;

/// Scrollable commit graph backed by the retained scene of [`AppState`]
#[derive(Default)]
pub struct HistoryView {
    last_click: Option<egui::Pos2>,
}

impl HistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        state.scene.set_text_color(ui.visuals().text_color());
        let held = ui.input(|i| i.modifiers.command);
        state.set_modifier(held);

        if state.plot.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No commits to show");
            });
            return;
        }

        egui::ScrollArea::both()
            .id_salt("history_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let size = egui::vec2(
                    state.scene.width().max(ui.available_width()),
                    state.scene.height(),
                );
                let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
                let origin = response.rect.min;
                state.scene.paint(&painter, origin);

                if response.clicked() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        let local = (pointer - origin).to_pos2();
                        self.last_click = Some(local);
                        if !state.handle_click(local) {
                            tracing::debug!("Click at {:?} hit nothing", local);
                        }
                    }
                }
            });
    }

    /// Scene position of the most recent primary click
    pub fn last_click(&self) -> Option<egui::Pos2> {
        self.last_click
    }
}
