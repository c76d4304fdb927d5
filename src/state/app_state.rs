use crate::git::{ErrorRecovery, ErrorReporter, GitRepository, PathStatus, StatusScan, TextDiff};
use crate::graph::{PlotCommit, PlotCommitList};
use crate::models::Change;
use crate::render::scene::SceneRenderer;
use crate::state::config::AppConfig;
use crate::state::selection::{Selection, SelectionCallbacks};
use anyhow::Result;
use egui::Pos2;
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

/// Highlight change requested by a selection callback
#[derive(Debug, Clone, PartialEq, Eq)]
enum Highlight {
    On(String),
    Off(String),
}

pub struct AppState {
    pub config: AppConfig,
    pub repository: Option<GitRepository>,
    pub plot: PlotCommitList,
    pub scene: SceneRenderer,
    pub selection: Selection<String>,
    pub selected_commit: Option<String>,
    pub changes: Vec<Change>,
    pub statuses: Vec<PathStatus>,
    pub error_message: Option<String>,
    status_scan: Option<StatusScan>,
    clicks: Rc<RefCell<Vec<String>>>,
    highlights: Rc<RefCell<Vec<Highlight>>>,
    modifier: Rc<Cell<bool>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut scene = SceneRenderer::new(
            config.graph.geometry(),
            config.graph.palette_colors(),
            config.graph.label_colors(),
        );
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);
        scene.on_commit_clicked(move |commit: &PlotCommit| sink.borrow_mut().push(commit.id().to_string()));

        let highlights = Rc::new(RefCell::new(Vec::new()));
        let on = Rc::clone(&highlights);
        let off = Rc::clone(&highlights);
        let callbacks = SelectionCallbacks::new(
            move |id: &String| on.borrow_mut().push(Highlight::On(id.clone())),
            move |id: &String| off.borrow_mut().push(Highlight::Off(id.clone())),
        );

        let modifier = Rc::new(Cell::new(false));
        let held = Rc::clone(&modifier);
        let selection = Selection::for_mode(config.selection_mode, callbacks, move || held.get());

        Self {
            config,
            repository: None,
            plot: PlotCommitList::new(),
            scene,
            selection,
            selected_commit: None,
            changes: Vec::new(),
            statuses: Vec::new(),
            error_message: None,
            status_scan: None,
            clicks,
            highlights,
            modifier,
        }
    }

    pub fn open_repository(&mut self, path: &Path) -> Result<()> {
        let repo = GitRepository::discover(path)?;
        self.config.add_recent_repository(repo.path().to_path_buf());
        self.repository = Some(repo);
        self.refresh()
    }

    /// Rebuild the plot from the repository and restart the status scan
    pub fn refresh(&mut self) -> Result<()> {
        let Some(repo) = self.repository.as_ref() else {
            return Ok(());
        };

        let list = {
            let mut walk = repo.walk()?;
            PlotCommitList::build(&mut walk, self.config.commit_limit)
        };
        let scan = StatusScan::start(repo.path());

        self.load_list(list);
        self.statuses.clear();
        self.status_scan = Some(scan);
        self.error_message = None;
        Ok(())
    }

    /// Replace the plotted commits. The selection starts over.
    pub fn load_list(&mut self, list: PlotCommitList) {
        self.selection.clear();
        self.selected_commit = None;
        self.changes.clear();
        self.scene.update(&list);
        self.plot = list;
        self.apply_highlights();
    }

    /// Whether the multi-select modifier is held, read by the standard
    /// selection strategy
    pub fn set_modifier(&mut self, held: bool) {
        self.modifier.set(held);
    }

    /// Forward a click in scene coordinates. Returns true when it hit a commit
    /// or label.
    pub fn handle_click(&mut self, pos: Pos2) -> bool {
        let hit = self.scene.click(pos);
        let clicked: Vec<String> = self.clicks.borrow_mut().drain(..).collect();
        for id in clicked {
            self.handle_commit_click(&id);
        }
        hit
    }

    pub fn handle_commit_click(&mut self, id: &str) {
        self.selection.update(&[id.to_string()]);
        self.apply_highlights();

        self.selected_commit = self.selection.selected_items().last().cloned();
        self.changes.clear();
        let Some(selected) = self.selected_commit.clone() else {
            return;
        };
        let Some(repo) = self.repository.as_ref() else {
            return;
        };
        match repo.commit_changes(None, &selected) {
            Ok(changes) => self.changes = changes,
            Err(e) => self.report(&e, "loading commit changes"),
        }
    }

    pub fn selected_plot_commit(&self) -> Option<&PlotCommit> {
        self.selected_commit
            .as_deref()
            .and_then(|id| self.plot.find(id))
    }

    pub fn change_diff(&mut self, change: &Change) -> Option<TextDiff> {
        let repo = self.repository.as_ref()?;
        let max_bytes = (self.config.diff_settings.max_file_size_kb as usize).saturating_mul(1024);
        match repo.change_diff(change, max_bytes) {
            Ok(diff) => Some(diff),
            Err(e) => {
                self.report(&e, "loading diff");
                None
            }
        }
    }

    /// Collect status results delivered since the last frame. Returns true
    /// when anything new arrived.
    pub fn poll_status(&mut self) -> bool {
        let Some(scan) = self.status_scan.as_mut() else {
            return false;
        };
        let fresh = scan.drain();
        let arrived = !fresh.is_empty();
        self.statuses.extend(fresh);
        if scan.is_finished() {
            self.statuses.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.path.cmp(&b.path)));
            self.status_scan = None;
            return true;
        }
        arrived
    }

    pub fn is_scanning(&self) -> bool {
        self.status_scan.is_some()
    }

    pub fn report(&mut self, error: &anyhow::Error, context: &str) {
        ErrorReporter::log_anyhow(error, context);
        self.error_message = Some(ErrorRecovery::describe(error));
    }

    fn apply_highlights(&mut self) {
        let pending: Vec<Highlight> = self.highlights.borrow_mut().drain(..).collect();
        for highlight in pending {
            match highlight {
                Highlight::On(id) => self.scene.select(&id),
                Highlight::Off(id) => self.scene.unselect(&id),
            };
        }
    }
}
