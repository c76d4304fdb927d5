use crate::state::{AppConfig, AppState};
use crate::ui::{ChangesView, HistoryView};
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

pub struct HistoryApp {
    state: AppState,
    history_view: HistoryView,
    changes_view: ChangesView,
    path_input: String,
}

impl HistoryApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, initial: Option<PathBuf>) -> Self {
        let mut app = Self::with_config(AppConfig::load());
        if let Some(path) = initial {
            app.open_repository(path);
        }
        app
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
            history_view: HistoryView::new(),
            changes_view: ChangesView::new(),
            path_input: String::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn open_repository(&mut self, path: PathBuf) {
        self.path_input = path.display().to_string();
        match self.state.open_repository(&path) {
            Ok(()) => self.state.config.persist(),
            Err(e) => {
                self.state.config.remove_recent_repository(&path);
                self.state.report(&e, "opening repository");
            }
        }
    }

    fn refresh(&mut self) {
        if let Err(e) = self.state.refresh() {
            self.state.report(&e, "refreshing history");
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut open = None;
                ui.menu_button("Recent", |ui| {
                    if self.state.config.recent_repositories.is_empty() {
                        ui.label("No recent repositories");
                    }
                    for path in &self.state.config.recent_repositories {
                        if ui.button(path.display().to_string()).clicked() {
                            open = Some(path.clone());
                            ui.close();
                        }
                    }
                });

                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.path_input)
                        .hint_text("Repository path")
                        .desired_width(400.0),
                );
                let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Open").clicked() || submitted {
                    open = Some(PathBuf::from(self.path_input.trim()));
                }
                if ui.button("Refresh").clicked() {
                    self.refresh();
                }

                if let Some(path) = open {
                    self.open_repository(path);
                }
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.state.repository.as_ref() {
                    Some(repo) => {
                        let info = repo.info();
                        ui.label(format!("Repository: {}", info.name));
                        if let Some(branch) = &info.head_branch {
                            ui.separator();
                            ui.label(format!("Branch: {}", branch));
                        }
                        ui.separator();
                        ui.label(format!("Commits: {}", self.state.plot.len()));
                        if !self.state.plot.is_complete() {
                            ui.label("(limited)");
                        }
                    }
                    None => {
                        ui.label("No repository opened");
                    }
                }

                if let Some(error) = self.state.error_message.clone() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("x").clicked() {
                            self.state.error_message = None;
                        }
                        ui.colored_label(egui::Color32::from_rgb(220, 50, 50), error);
                    });
                }
            });
        });
    }
}

impl eframe::App for HistoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::F5)) {
            self.refresh();
        }

        if self.state.poll_status() {
            ctx.request_repaint();
        }
        if self.state.is_scanning() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);

        egui::SidePanel::right("changes_panel")
            .default_width(420.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.changes_view.show(ui, &mut self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.history_view.show(ui, &mut self.state);
        });
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.state.config.persist();
    }
}
